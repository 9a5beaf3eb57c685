use {
    model::RoleName,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    tracing::Level,
};

/// Runs one of the domain validators over JSON documents and prints the
/// normalized value or the validation error of each document.
#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Which validator to run.
    #[clap(long, env, value_enum)]
    pub kind: Kind,

    /// File to read documents from. Reads stdin when omitted.
    #[clap(long, env)]
    pub input: Option<PathBuf>,

    /// Treat every non-empty input line as a separate document.
    #[clap(long, env)]
    pub ndjson: bool,

    /// Comma separated roles to evaluate role requirements against, e.g.
    /// `admin,tokenManager`. Only used with `--kind role-requirement`.
    #[clap(long, env, value_delimiter = ',')]
    pub check_roles: Option<Vec<RoleName>>,
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,validator=info")]
    pub log_filter: String,

    /// Events at this level or more severe are written to stderr, the rest to
    /// stdout. Defaults to everything so that stdout only carries reports.
    #[clap(long, env, default_value = "trace", value_parser = observe::tracing::parse_level)]
    pub log_stderr_threshold: Level,

    /// Emit log lines as JSON objects.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Kind {
    Address,
    Hash,
    Decimal,
    AssetType,
    AssetTypes,
    FactoryTypeId,
    ComplianceTypeId,
    Role,
    Roles,
    Topic,
    RoleRequirement,
    RoleSet,
    IdentityClaim,
    ComplianceModule,
}

impl LoggingArguments {
    pub fn config(&self) -> observe::Config {
        observe::Config::new(
            &self.log_filter,
            self.log_stderr_threshold,
            self.use_json_logs,
        )
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            kind,
            input,
            ndjson,
            check_roles,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "kind: {kind}")?;
        match input {
            Some(path) => writeln!(f, "input: {}", path.display())?,
            None => writeln!(f, "input: stdin")?,
        }
        writeln!(f, "ndjson: {ndjson}")?;
        match check_roles {
            Some(roles) => {
                let roles = roles.iter().map(ToString::to_string).collect::<Vec<_>>();
                writeln!(f, "check_roles: {}", roles.join(","))?;
            }
            None => writeln!(f, "check_roles: None")?,
        }
        Ok(())
    }
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}
