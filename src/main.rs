use std::path::PathBuf;

use clap::Parser;
use vitrine::{options::Options, Viewer};

/// Native window for the vitrine centerpiece scene.
#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about)]
struct Cli {
    /// Preset name under the presets directory, or a path to a TOML file.
    #[arg(long)]
    preset: Option<String>,

    /// Directory searched for named presets.
    #[arg(long, default_value = "assets/presets")]
    presets_dir: PathBuf,

    /// Environment map path or URL (Radiance .hdr).
    #[arg(long)]
    env_url: Option<String>,

    /// Override the particle count.
    #[arg(long)]
    particles: Option<usize>,

    /// List available presets and exit.
    #[arg(long)]
    list_presets: bool,
}

fn resolve_preset(cli: &Cli) -> Result<Options, vitrine::VitrineError> {
    let Some(preset) = &cli.preset else {
        return Ok(Options::default());
    };
    let direct = PathBuf::from(preset);
    let path = if direct.exists() {
        direct
    } else {
        cli.presets_dir.join(format!("{preset}.toml"))
    };
    log::info!("loading preset {}", path.display());
    Options::load(&path)
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();

    if cli.list_presets {
        for name in Options::list_presets(&cli.presets_dir) {
            log::info!("{name}");
        }
        return;
    }

    let mut options = match resolve_preset(&cli) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    if let Some(count) = cli.particles {
        options.scene.particle_count = count;
    }

    let mut builder = Viewer::builder().with_options(options);
    if let Some(url) = cli.env_url {
        builder = builder.with_env_url(url);
    }
    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
