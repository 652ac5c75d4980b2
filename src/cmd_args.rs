use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// HELD server URI
    /// Optional when the selected profile provides one.
    #[clap(short = 'u', long, help = "uri used for connection")]
    uri: Option<String>,

    /// Custom headers
    /// Optional, repeatable. Sent with every HELD request.
    #[clap(
        short = 'H',
        long = "header",
        value_name = "NAME:VALUE",
        help = "custom header sent with every request"
    )]
    headers: Vec<String>,

    /// Profile name
    /// Optional. Profile to read defaults from. Default is 'default'.
    /// A missing profile is not an error.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Verbose mode
    /// Optional. Start the session with verbose output enabled.
    #[clap(
        short = 'v',
        long,
        help = "Start with verbose output",
        default_value = "false"
    )]
    verbose: bool,

    /// Exact mode
    /// Optional. Start the session requesting exact location types.
    #[clap(
        short = 'e',
        long,
        help = "Start with exact location types",
        default_value = "false"
    )]
    exact: bool,

    /// Timeout
    /// Optional. Seconds before a HELD request or dereference gives up.
    #[clap(short = 't', long, value_name = "SECS", help = "request timeout in seconds")]
    timeout: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    uri: Option<String>,
    headers: Vec<String>,
    profile: String,
    verbose: bool,
    exact: bool,
    timeout: Option<u64>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn exact(&self) -> bool {
        self.exact
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            uri: args.uri,
            headers: args.headers,
            profile: args.profile,
            verbose: args.verbose,
            exact: args.exact,
            timeout: args.timeout,
        }
    }
}
