//! Terminal front end for the caption form.
//!
//! The interactive session reads one command per line and applies it to a
//! [`FormController`], printing the form's messages and the caption list the
//! way the result area would show them.

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::client::CaptionService;
use crate::form::{FormController, ImageFile, SelectImageError, SubmitError, Tone, WritingStyle};
use crate::render::{CaptionView, ResultRenderer};
use crate::utils::human_size;

pub const HELP_TEXT: &str = "\
Commands:
  image <path>              upload a PNG/JPEG image and fetch its description
  description <text>        set the description
  tone <name>               Happy, Excited, Funny, Sarcastic, Professional,
                            Sad, Inspiring, Calm, Witty, Nostalgic
  style <name>              Casual, Formal, Poetic, Narrative, Conversational,
                            Persuasive
  context <text>            set additional context (empty to remove)
  emojis on|off|toggle      include emojis
  hashtags on|off|toggle    include hashtags
  submit                    generate captions
  clear                     reset the form
  show                      print the current form
  help                      show this help
  quit                      leave";

/// Setting for an on/off switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

impl Switch {
    fn parse(arg: &str) -> Result<Self, String> {
        match arg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" => Ok(Switch::On),
            "off" | "no" | "false" => Ok(Switch::Off),
            "" | "toggle" => Ok(Switch::Toggle),
            other => Err(format!("Expected on, off or toggle, got '{}'", other)),
        }
    }

    fn apply(self, current: bool) -> bool {
        match self {
            Switch::On => true,
            Switch::Off => false,
            Switch::Toggle => !current,
        }
    }
}

/// One line of input in the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Image(PathBuf),
    Description(String),
    Tone(Tone),
    Style(WritingStyle),
    Context(String),
    Emojis(Switch),
    Hashtags(Switch),
    Submit,
    Clear,
    Show,
    Help,
    Quit,
}

impl FormCommand {
    /// Parses a line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "image" | "upload" => {
                if arg.is_empty() {
                    return Err("Usage: image <path>".to_string());
                }
                FormCommand::Image(PathBuf::from(arg))
            }
            "description" | "desc" => FormCommand::Description(arg.to_string()),
            "tone" => FormCommand::Tone(arg.parse()?),
            "style" => FormCommand::Style(arg.parse()?),
            "context" => FormCommand::Context(arg.to_string()),
            "emojis" => FormCommand::Emojis(Switch::parse(arg)?),
            "hashtags" => FormCommand::Hashtags(Switch::parse(arg)?),
            "submit" | "generate" => FormCommand::Submit,
            "clear" => FormCommand::Clear,
            "show" => FormCommand::Show,
            "help" | "?" => FormCommand::Help,
            "quit" | "exit" => FormCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help' for a list of commands.", other)),
        };
        Ok(Some(command))
    }
}

/// Loads an image from disk into the form, printing the outcome
pub async fn select_image_from_path<S: CaptionService, W: Write>(
    form: &mut FormController<S>,
    path: &Path,
    out: &mut W,
) -> Result<bool> {
    let file = match ImageFile::open(path).await {
        Ok(file) => file,
        Err(e) => {
            writeln!(out, "Cannot open {}: {}", path.display(), e)?;
            return Ok(false);
        }
    };

    writeln!(out, "Describing {} ({})...", file.name(), human_size(file.size()))?;
    match form.select_image(file).await {
        Ok(()) => {
            writeln!(out, "Description: {}", form.fields().description)?;
            Ok(true)
        }
        Err(SelectImageError::TooLarge { .. }) | Err(SelectImageError::UnsupportedType) => {
            writeln!(out, "{}", form.upload_hint())?;
            Ok(false)
        }
        Err(e) => {
            writeln!(out, "Could not describe image: {}", e)?;
            Ok(false)
        }
    }
}

/// Submits the form and prints the loading indicator followed by the result area
pub async fn submit_and_render<S: CaptionService, W: Write>(
    form: &mut FormController<S>,
    renderer: &mut ResultRenderer,
    out: &mut W,
) -> Result<bool> {
    if form.can_submit() {
        let frame = renderer.render(CaptionView::Loading, form.generation());
        renderer.write_frame(&frame, out)?;
    }

    let succeeded = match form.submit().await {
        Ok(_) => true,
        Err(SubmitError::Validation) => {
            if let Some(message) = form.validation_message() {
                writeln!(out, "{}", message)?;
            }
            false
        }
        Err(SubmitError::Service(e)) => {
            debug!("Submit failed: {}", e);
            if let Some(message) = form.error() {
                writeln!(out, "{}", message)?;
            }
            false
        }
    };

    let frame = renderer.render(form.caption_view(), form.generation());
    renderer.write_frame(&frame, out)?;
    Ok(succeeded)
}

/// Prints the current state of the form
pub fn print_form<S: CaptionService, W: Write>(form: &FormController<S>, out: &mut W) -> Result<()> {
    let fields = form.fields();
    match form.preview() {
        Some(image) => writeln!(out, "Image:       {} ({} chars)", image.kind().mime_type(), image.data_url().len())?,
        None => writeln!(out, "Image:       none ({})", form.upload_hint())?,
    }
    writeln!(out, "Description: {}", fields.description)?;
    writeln!(out, "Tone:        {}", fields.tone)?;
    writeln!(out, "Style:       {}", fields.style)?;
    writeln!(out, "Context:     {}", fields.additional_context)?;
    writeln!(out, "Emojis:      {}", if fields.emojis { "on" } else { "off" })?;
    writeln!(out, "Hashtags:    {}", if fields.hashtags { "on" } else { "off" })?;
    if let Some(message) = form.validation_message() {
        writeln!(out, "! {}", message)?;
    }
    if let Some(error) = form.error() {
        writeln!(out, "! {}", error)?;
    }
    Ok(())
}

/// Runs the interactive session until `quit` or end of input
pub async fn run_session<S, R, W>(form: &mut FormController<S>, input: R, out: &mut W) -> Result<()>
where
    S: CaptionService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut renderer = ResultRenderer::new();
    let mut lines = input.lines();

    writeln!(out, "Type 'help' for commands.")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match FormCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        debug!("Command: {:?}", command);

        match command {
            FormCommand::Image(path) => {
                select_image_from_path(form, &path, out).await?;
            }
            FormCommand::Description(text) => form.set_description(text),
            FormCommand::Tone(tone) => form.set_tone(tone),
            FormCommand::Style(style) => form.set_style(style),
            FormCommand::Context(text) => form.set_additional_context(text),
            FormCommand::Emojis(switch) => {
                let value = switch.apply(form.fields().emojis);
                form.set_emojis(value);
            }
            FormCommand::Hashtags(switch) => {
                let value = switch.apply(form.fields().hashtags);
                form.set_hashtags(value);
            }
            FormCommand::Submit => {
                submit_and_render(form, &mut renderer, out).await?;
            }
            FormCommand::Clear => {
                form.clear();
                writeln!(out, "Form cleared.")?;
            }
            FormCommand::Show => {
                print_form(form, out)?;
                let frame = renderer.render(form.caption_view(), form.generation());
                renderer.write_frame(&frame, out)?;
            }
            FormCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
            FormCommand::Quit => break,
        }
    }
    Ok(())
}
