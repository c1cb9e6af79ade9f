use clap::{Parser, Subcommand};

/// Arguments for runtime command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Print the runtime binary that would be used:\n    edge-bundler runtime path\n\n\
                  Ignore any runtime on PATH:\n    edge-bundler runtime path --no-global\n\n\
                  Run the runtime with arbitrary arguments:\n    edge-bundler runtime exec -- eval 'console.log(1)'")]
pub struct RuntimeArgs {
    #[command(subcommand)]
    pub command: RuntimeSubcommand,
}

/// Runtime subcommands
#[derive(Subcommand, Debug)]
pub enum RuntimeSubcommand {
    /// Print the path of the runtime binary, downloading it if needed
    Path,

    /// Run the runtime binary with the given arguments
    Exec(ExecArgs),
}

/// Arguments for runtime exec command
#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// Arguments passed to the runtime
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
