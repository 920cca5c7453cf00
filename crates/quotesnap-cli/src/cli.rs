//! Command-line arguments.
//!
//! ```bash
//! quotesnap AAPL ^GSPC BTC-USD EURUSD=X GC=F
//! ```
//!
//! There are no flags: every argument, `--help` included, is a symbol.

use std::ffi::OsString;

use clap::Parser;

/// Fetch quotes for ticker symbols and print them as JSON.
#[derive(Debug, Parser)]
#[command(
    name = "quotesnap",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Ticker symbols, passed to the provider verbatim.
    #[arg(value_name = "SYMBOL", allow_hyphen_values = true, trailing_var_arg = true)]
    symbols: Vec<OsString>,
}

impl Cli {
    /// Parses argv, falling back to taking every argument after the program
    /// name as a symbol if clap rejects the command line.
    pub fn from_args_os<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        Self::try_parse_from(&args).unwrap_or_else(|error| {
            tracing::debug!(%error, "argument parsing failed, using raw arguments");
            Self {
                symbols: args.into_iter().skip(1).collect(),
            }
        })
    }

    /// Symbols as text. Arguments that are not valid UTF-8 are converted
    /// lossily and then fail lookup like any unknown ticker.
    pub fn symbols(&self) -> Vec<String> {
        self.symbols
            .iter()
            .map(|symbol| symbol.to_string_lossy().into_owned())
            .collect()
    }
}
