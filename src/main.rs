use anyhow::{Context, Result};
use captionify::cli::{run_session, select_image_from_path, submit_and_render};
use captionify::client::{CaptionService, HttpCaptionService};
use captionify::config::AppConfig;
use captionify::form::{FormController, ImageFile, Tone, WritingStyle};
use captionify::render::ResultRenderer;
use captionify::utils::logger::init_logger;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Enhance your photos with AI-crafted captions that align with your desired
/// mood and style.
#[derive(Parser, Debug)]
#[command(name = "captionify", version)]
#[command(about = "Generate social-media captions for your photos")]
struct Cli {
    /// Configuration file (defaults to ./captionify.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the caption service
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the service's description of an image
    Describe {
        /// PNG or JPEG image under 10MB
        image: PathBuf,
    },
    /// Generate captions in one go
    Generate(GenerateArgs),
    /// Fill in the form step by step
    Interactive,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// PNG or JPEG image under 10MB; its description fills the form
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Description of the image (overrides the one fetched for --image)
    #[arg(short, long)]
    description: Option<String>,

    /// Mood of the captions
    #[arg(short, long, default_value_t = Tone::Happy)]
    tone: Tone,

    /// Writing style of the captions
    #[arg(short, long, default_value_t = WritingStyle::Casual)]
    style: WritingStyle,

    /// Additional context such as location or event
    #[arg(short = 'x', long)]
    context: Option<String>,

    /// Leave emojis out
    #[arg(long)]
    no_emojis: bool,

    /// Leave hashtags out
    #[arg(long)]
    no_hashtags: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
        config.validate()?;
    }

    let log_file = init_logger(&config.log_dir)?;
    info!("Using caption service at {}", config.api_url);

    let service = HttpCaptionService::from_config(&config)?;
    let mut form = FormController::new(service);
    let mut stdout = io::stdout();

    let result = match cli.command {
        Command::Describe { image } => describe(&mut form, image, &mut stdout).await,
        Command::Generate(args) => generate(&mut form, args, &mut stdout).await,
        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_session(&mut form, stdin, &mut stdout).await
        }
    };

    if let Err(e) = &result {
        eprintln!("Details were logged to {}", log_file.display());
        info!("Exiting with error: {:#}", e);
    }
    result
}

async fn describe<S: CaptionService, W: Write>(form: &mut FormController<S>, image: PathBuf, out: &mut W) -> Result<()> {
    let file = ImageFile::open(&image)
        .await
        .with_context(|| format!("Cannot open {}", image.display()))?;
    form.select_image(file).await.map_err(|e| {
        anyhow::anyhow!("{} ({})", e, form.upload_hint())
    })?;
    writeln!(out, "{}", form.fields().description)?;
    Ok(())
}

async fn generate<S: CaptionService, W: Write>(form: &mut FormController<S>, args: GenerateArgs, out: &mut W) -> Result<()> {
    if let Some(image) = &args.image {
        let selected = select_image_from_path(form, image, out).await?;
        if !selected && args.description.is_none() {
            anyhow::bail!("No description available for {}", image.display());
        }
    }

    if let Some(description) = args.description {
        form.set_description(description);
    }
    form.set_tone(args.tone);
    form.set_style(args.style);
    if let Some(context) = args.context {
        form.set_additional_context(context);
    }
    form.set_emojis(!args.no_emojis);
    form.set_hashtags(!args.no_hashtags);

    let mut renderer = ResultRenderer::new();
    if !submit_and_render(form, &mut renderer, out).await? {
        anyhow::bail!("Caption generation did not succeed");
    }
    Ok(())
}
