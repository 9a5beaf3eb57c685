use {
    crate::arguments::{Arguments, Kind},
    anyhow::{Context, Result},
    model::{
        AccessControlRoleSet,
        Address,
        AssetFactoryTypeId,
        AssetType,
        ComplianceModuleConfig,
        ComplianceTypeId,
        Decimal,
        Hash,
        IdentityClaim,
        RoleName,
        RoleRequirement,
        TopicName,
        Validate,
        ValidationError,
        enumeration,
        satisfies,
    },
    serde::Serialize,
    serde_json::Value,
    std::io::{BufRead, Write},
};

/// Outcome of validating a single document, written as one JSON line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Ok(Value),
    Error(ValidationError),
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    outcome: &'a Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    satisfied: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
}

impl Summary {
    pub fn success(&self) -> bool {
        self.invalid == 0
    }
}

/// Validates every document of `input` and writes one report line per
/// document to `output`.
pub fn run(args: &Arguments, input: impl BufRead, mut output: impl Write) -> Result<Summary> {
    let mut summary = Summary::default();
    for document in documents(input, args.ndjson)? {
        let (outcome, satisfied) = match document {
            Ok(value) => check(args, &value),
            Err(err) => (Outcome::Error(err), None),
        };
        match &outcome {
            Outcome::Ok(_) => summary.valid += 1,
            Outcome::Error(err) => {
                tracing::debug!(%err, "document rejected");
                summary.invalid += 1;
            }
        }
        let report = Report {
            outcome: &outcome,
            satisfied,
        };
        serde_json::to_writer(&mut output, &report).context("failed to write report")?;
        writeln!(output).context("failed to write report")?;
    }
    output.flush().context("failed to flush output")?;
    tracing::info!(valid = summary.valid, invalid = summary.invalid, "validation finished");
    Ok(summary)
}

/// Splits the input into JSON documents. Documents that are not valid JSON
/// are reported like any other malformed input.
fn documents(
    mut input: impl BufRead,
    ndjson: bool,
) -> Result<Vec<Result<Value, ValidationError>>> {
    let parse = |text: &str| {
        serde_json::from_str::<Value>(text)
            .map_err(|err| ValidationError::format(format!("invalid JSON: {err}")))
    };
    if !ndjson {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .context("failed to read input")?;
        return Ok(vec![parse(&text)]);
    }
    let mut documents = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read input line")?;
        if !line.trim().is_empty() {
            documents.push(parse(&line));
        }
    }
    Ok(documents)
}

fn check(args: &Arguments, value: &Value) -> (Outcome, Option<bool>) {
    if args.kind == Kind::RoleRequirement {
        return match RoleRequirement::validate(value) {
            Ok(requirement) => {
                let satisfied = args
                    .check_roles
                    .as_deref()
                    .map(|roles| satisfies(roles, &requirement));
                (normalized(&requirement), satisfied)
            }
            Err(err) => (Outcome::Error(err), None),
        };
    }
    (validate(args.kind, value), None)
}

/// Runs the validator selected by `kind` and returns its normalized form.
pub fn validate(kind: Kind, value: &Value) -> Outcome {
    fn with<T: Validate + Serialize>(value: &Value) -> Outcome {
        match T::validate(value) {
            Ok(validated) => normalized(&validated),
            Err(err) => Outcome::Error(err),
        }
    }

    match kind {
        Kind::Address => with::<Address>(value),
        Kind::Hash => with::<Hash>(value),
        Kind::Decimal => with::<Decimal>(value),
        Kind::AssetType => with::<AssetType>(value),
        Kind::AssetTypes => match enumeration::validate_list::<AssetType>(value) {
            Ok(types) => normalized(&types),
            Err(err) => Outcome::Error(err),
        },
        Kind::FactoryTypeId => with::<AssetFactoryTypeId>(value),
        Kind::ComplianceTypeId => with::<ComplianceTypeId>(value),
        Kind::Role => with::<RoleName>(value),
        Kind::Roles => match enumeration::validate_set::<RoleName>(value) {
            Ok(roles) => normalized(&roles),
            Err(err) => Outcome::Error(err),
        },
        Kind::Topic => with::<TopicName>(value),
        Kind::RoleRequirement => with::<RoleRequirement>(value),
        Kind::RoleSet => with::<AccessControlRoleSet>(value),
        Kind::IdentityClaim => with::<IdentityClaim>(value),
        Kind::ComplianceModule => with::<ComplianceModuleConfig>(value),
    }
}

fn normalized(value: &impl Serialize) -> Outcome {
    match serde_json::to_value(value) {
        Ok(value) => Outcome::Ok(value),
        Err(err) => Outcome::Error(ValidationError::format(format!(
            "normalized value cannot be represented as JSON: {err}"
        ))),
    }
}
