use leia_models::SchemaDetails;
use leia_validator::{MessageValidator, StructuralMessageValidator};
use serde_json::Value;

use crate::cmd::{read_json, ValidateArgs};
use crate::exit::{json_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_violations, OutputFormat};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let schema: SchemaDetails = read_json(&args.schema)?;
    let payload: Value = match (&args.json, &args.file) {
        (Some(json), _) => {
            serde_json::from_str(json).map_err(|err| json_error("parse --json failed", err))?
        }
        (None, Some(path)) => read_json(path)?,
        (None, None) => return Err(CliError::new(USAGE, "one of --json or --file is required")),
    };

    let violations = StructuralMessageValidator.validate(&schema, &payload);
    print_violations(&schema.schema_key, &violations, format);

    Ok(if violations.is_empty() {
        SUCCESS
    } else {
        DATA_INVALID
    })
}
