use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use core_types::WindowId;
use dom::PageFixture;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;
use widget::config::resolver_for_path;
use widget::{Defaults, EmbeddedFrame, LocalClock, Runtime, ValuesResolver};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "formgate")]
#[command(about = "Gate a host page's button on a pattern, from inside an embedded widget")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a host page fixture and run the widget against it
    Run {
        /// Host page fixture (TOML or JSON)
        #[arg(long)]
        page: PathBuf,

        /// Widget values (TOML or JSON); built-in defaults when omitted
        #[arg(long, env = "FORMGATE_CONFIG")]
        config: Option<PathBuf>,

        /// Window id of the widget's own frame, as named in the fixture
        #[arg(long, default_value_t = 1)]
        window: u64,

        /// Text typed into the bound textbox, in order
        #[arg(long = "type")]
        inputs: Vec<String>,

        /// Seconds of virtual time to let the retry loop run
        #[arg(long, default_value_t = 0)]
        seconds: u64,

        /// Deny the widget access to the host page
        #[arg(long)]
        cross_origin: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Also installs the `log` bridge for the library crates.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            page,
            config,
            window,
            inputs,
            seconds,
            cross_origin,
        } => run(page, config, WindowId(window), inputs, seconds, cross_origin),
    }
}

fn run(
    page: PathBuf,
    config: Option<PathBuf>,
    window: WindowId,
    inputs: Vec<String>,
    seconds: u64,
    cross_origin: bool,
) -> Result<()> {
    let host = PageFixture::load(&page)
        .and_then(|fixture| fixture.build())
        .with_context(|| format!("loading host page {}", page.display()))?;

    let values = match &config {
        Some(path) => resolver_for_path(path)?.resolve()?,
        None => Defaults.resolve()?,
    };

    let frame = if cross_origin {
        EmbeddedFrame::cross_origin(
            window,
            host,
            "Blocked a frame from accessing a cross-origin frame.",
        )
    } else {
        EmbeddedFrame::same_origin(window, host)
    };
    let mut runtime = Runtime::start(frame, values, Box::new(LocalClock))?;

    for _ in 0..seconds {
        runtime.advance(Duration::from_secs(1));
    }

    if !inputs.is_empty() {
        let Some(binding) = runtime.widget().gate().binding().copied() else {
            bail!("cannot type into the host page: no textbox is bound");
        };
        for text in &inputs {
            runtime.type_text(binding.textbox, text)?;
            runtime.commit(binding.textbox)?;
        }
    }

    print_report(&runtime);
    Ok(())
}

fn print_report(runtime: &Runtime) {
    let widget = runtime.widget();
    println!("status:");
    for line in widget.page().status_lines() {
        println!("  {line}");
    }

    println!("retry: {:?} after {} attempt(s)", widget.retry_phase(), widget.attempts());

    let Some(binding) = widget.gate().binding() else {
        println!("gate: not installed");
        return;
    };
    let host = runtime.frame().host();
    let tree = host.tree();
    println!(
        "gate: {} -> {}",
        widget::discovery::describe(tree, binding.textbox),
        widget::discovery::describe(tree, binding.button)
    );
    println!(
        "value: {:?}",
        host.value(binding.textbox).unwrap_or_default()
    );
    println!(
        "button: {} (opacity {}, cursor {})",
        if host.is_disabled(binding.button) {
            "disabled"
        } else {
            "enabled"
        },
        host.style_property(binding.button, "opacity").unwrap_or("-"),
        host.style_property(binding.button, "cursor").unwrap_or("-"),
    );
    if let Some(result) = widget.page().validation_result() {
        println!("result: {result}");
    }
}
