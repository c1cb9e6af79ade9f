use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    edge-bundler completions bash > ~/.bash_completion.d/edge-bundler\n\n\
                  Generate zsh completions:\n    edge-bundler completions zsh > ~/.zfunc/_edge-bundler\n\n\
                  Generate fish completions:\n    edge-bundler completions fish > ~/.config/fish/completions/edge-bundler.fish\n\n\
                  Generate PowerShell completions:\n    edge-bundler completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
