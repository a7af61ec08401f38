use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// API base URL
    /// Optional. Overrides the configured persistence backend address.
    #[clap(short = 's', long, help = "API base URL")]
    server: Option<String>,

    /// Collection id
    /// Optional. Collection to open. Defaults to the first one the account
    /// has.
    #[clap(short = 'c', long, help = "collection id to open")]
    collection: Option<String>,

    /// Import file
    /// Optional. Import a collection file (Postman or bluebook JSON)
    /// before anything else.
    #[clap(long, value_name = "FILE", help = "import a collection file")]
    import: Option<PathBuf>,

    /// Export file
    /// Optional. Write the open collection to FILE in the .mb shape.
    #[clap(long, value_name = "FILE", help = "export the collection to FILE")]
    export: Option<PathBuf>,

    /// Name filter
    /// Optional. Only print nodes whose name (or a descendant's name)
    /// contains TEXT.
    #[clap(short = 'f', long, value_name = "TEXT", help = "filter the tree by name")]
    filter: Option<String>,

    /// Verbose mode
    /// Optional. Print verbose messages.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    server: Option<String>,
    collection: Option<String>,
    import: Option<PathBuf>,
    export: Option<PathBuf>,
    filter: Option<String>,
    verbose: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            server: args.server,
            collection: args.collection,
            import: args.import,
            export: args.export,
            filter: args.filter,
            verbose: args.verbose,
        }
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn import(&self) -> Option<&PathBuf> {
        self.import.as_ref()
    }

    pub fn export(&self) -> Option<&PathBuf> {
        self.export.as_ref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
