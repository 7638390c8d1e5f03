use scriban_markup::{load_component_file, FileTarget, MarkupError, RenderConfig, Renderer};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: sbn-render <component.yaml> <output> [config.yaml]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  sbn-render test-component.yaml index.sbn");
        eprintln!("  RUST_LOG=trace sbn-render card.yaml card.sbn render.yaml");
        process::exit(1);
    }

    match run(&args[1], &args[2], args.get(3).map(String::as_str)) {
        Ok(()) => {
            println!("✓ {} → {}", args[1], args[2]);
        }
        Err(e) => {
            eprintln!("✗ {} failed:", args[1]);
            print_error(&e);
            process::exit(1);
        }
    }
}

fn run(component_path: &str, output_path: &str, config_path: Option<&str>) -> Result<(), MarkupError> {
    let config = match config_path {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    };
    let component = load_component_file(component_path)?;
    tracing::info!(component = %component.name, output = output_path, "rendering");

    let mut target = FileTarget::new(output_path);
    Renderer::new(config).render(&component, None, &mut target)
}

fn print_error(error: &MarkupError) {
    match error {
        MarkupError::InvalidNode { path, reason } => {
            eprintln!("  Invalid node at {}:", path);
            eprintln!("    {}", reason);
        }
        MarkupError::InvalidComponentFile { reason } => {
            eprintln!("  Invalid component file:");
            eprintln!("    {}", reason);
        }
        MarkupError::Yaml(e) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", e);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
