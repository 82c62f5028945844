use super::open_session;
use crate::cli::DescribeArgs;
use crate::error::Result;
use structbind::engine::report::describe_mappings;
use tracing::info;

pub async fn run(args: DescribeArgs) -> Result<()> {
    let session = open_session(&args.input)?;

    if session.store.is_empty() {
        println!("No structures are bound to this alignment.");
        return Ok(());
    }

    info!("Describing mappings for {} structure(s).", session.store.len());
    let report = describe_mappings(&session.store, &session.registry)?;
    print!("{}", report);
    Ok(())
}
