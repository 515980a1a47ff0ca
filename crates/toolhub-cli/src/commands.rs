//! Subcommand definitions.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered servers with a freshly probed status
    Servers,

    /// Probe one server and print its status
    Status {
        /// Server id
        id: String,
    },

    /// List tools offered by healthy servers and local tools
    Tools,

    /// Route a tool call to its owning server
    Call {
        /// Tool name
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short = 'a', long = "args")]
        args: Option<String>,
    },

    /// Dispatch a raw protocol request envelope
    Request {
        /// Request envelope as JSON
        envelope: String,
    },

    /// Re-probe every server and print aggregate statistics
    Stats,
}
