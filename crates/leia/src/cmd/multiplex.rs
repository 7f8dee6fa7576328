use std::sync::Arc;

use leia_client::LeiaClient;
use leia_models::{MessageRequest, SchemaDetails};
use leia_refresher::StaticDataProvider;
use leia_validator::StructuralMessageValidator;
use tracing::debug;

use crate::cmd::{read_json, MultiplexArgs};
use crate::exit::{transformation_error, CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub fn run(args: MultiplexArgs, format: OutputFormat) -> CliResult<i32> {
    let schemas: Vec<SchemaDetails> = read_json(&args.schemas)?;
    let request: MessageRequest = read_json(&args.request)?;

    let mut client = LeiaClient::new(Arc::new(StaticDataProvider::new(schemas)));
    if !args.no_validate {
        client = client.with_message_validator(Arc::new(StructuralMessageValidator));
    }
    client
        .start()
        .map_err(|err| transformation_error("schema index build failed", err))?;

    let messages = client
        .multiplex(&request, None)
        .map_err(|err| transformation_error("multiplex failed", err))?;
    debug!(source = %request.schema_key, produced = messages.len(), "multiplex complete");

    print_messages(&messages, format);
    Ok(SUCCESS)
}
