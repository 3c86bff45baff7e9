use clap::{Parser, Subcommand};
use flockflow::export::export_to_dir;
use flockflow::prelude::*;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Inspect, edit and serve query plans
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a pipeline JSON file and print the graph
    Layout {
        /// Path to the pipeline JSON file
        pipeline_path: String,
        /// Wrap the tree in the prompt / query / results chain from this prompt data file
        #[arg(short, long)]
        prompt_data: Option<String>,
        /// Print React-Flow compatible JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply one parameter edit and print the new pipeline as JSON
    Edit {
        pipeline_path: String,
        #[arg(long)]
        id: OperatorId,
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
        /// Coerce the value to a number
        #[arg(long)]
        number: bool,
    },
    /// Write the result table of a prompt data file as CSV
    Export {
        prompt_data_path: String,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Run the gateway proxy
    Serve {
        #[arg(long, env = "BACKEND_URL")]
        backend_url: Option<String>,
        #[arg(long, env = "FLOCKFLOW_LISTEN")]
        listen: Option<SocketAddr>,
        /// Replace every per-endpoint timeout, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Layout {
            pipeline_path,
            prompt_data,
            json,
        } => run_layout(&pipeline_path, prompt_data.as_deref(), json),
        Command::Edit {
            pipeline_path,
            id,
            field,
            value,
            number,
        } => run_edit(&pipeline_path, id, &field, value, number),
        Command::Export {
            prompt_data_path,
            out,
        } => run_export(&prompt_data_path, out),
        Command::Serve {
            backend_url,
            listen,
            timeout_secs,
        } => run_serve(backend_url, listen, timeout_secs),
    }
}

fn load_pipeline(path: &str) -> Pipeline {
    Operator::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load pipeline '{}': {}", path, e)))
}

fn load_prompt_data(path: &str) -> PromptData {
    PromptData::from_file(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load prompt data '{}': {}", path, e))
    })
}

fn run_layout(pipeline_path: &str, prompt_data_path: Option<&str>, json: bool) {
    let tree = load_pipeline(pipeline_path);
    let prompt_data = prompt_data_path.map(load_prompt_data);

    let mut builder = LayoutEngine::builder(LayoutConfig::default());
    if let Some(data) = &prompt_data {
        builder = builder.with_prompt_chain(data);
    }
    let layout = builder.build().layout(&tree);

    if json {
        let rendered = serde_json::to_string_pretty(&layout)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize layout: {}", e)));
        println!("{}", rendered);
    } else {
        println!("{}", NodeFormatter::format_layout(&layout));
        println!(
            "{} operators, {} nodes, {} edges",
            tree.node_count(),
            layout.nodes.len(),
            layout.edges.len()
        );
    }
}

fn run_edit(pipeline_path: &str, id: OperatorId, field: &str, value: String, number: bool) {
    let tree = load_pipeline(pipeline_path);
    let kind = if number {
        ValueKind::Number
    } else {
        ValueKind::Raw
    };
    let edited = apply_field_edit(&tree, id, field, Value::String(value), kind);
    if std::sync::Arc::ptr_eq(&tree, &edited) {
        tracing::warn!(id, "no operator matched; pipeline unchanged");
    }
    let rendered = serde_json::to_string_pretty(&edited)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize pipeline: {}", e)));
    println!("{}", rendered);
}

fn run_export(prompt_data_path: &str, out: PathBuf) {
    let data = load_prompt_data(prompt_data_path);
    let path = export_to_dir(&data, &out)
        .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
    println!("Wrote {}", path.display());
}

fn run_serve(backend_url: Option<String>, listen: Option<SocketAddr>, timeout_secs: Option<u64>) {
    let mut config = GatewayConfig::from_env();
    if let Some(url) = backend_url {
        config = config.with_backend_url(url);
    }
    if let Some(addr) = listen {
        config = config.with_listen(addr);
    }
    if let Some(secs) = timeout_secs {
        config = config.with_timeout_override(Duration::from_secs(secs));
    }

    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start runtime: {}", e)));
    if let Err(e) = runtime.block_on(flockflow::gateway::proxy::serve(config)) {
        exit_with_error(&format!("Gateway stopped: {}", e));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
