/// Wrap-and-track example: submit a conversion, then follow it to a final state.
///
/// Demonstrates: submit without waiting, a manual status check, and bounded
/// polling with a custom interval and timeout.
/// Usage: cargo run --example wrap_and_track -- <AMOUNT> [BASE] [WRAPPED]
use std::time::Duration;

use coinbase_wrapped::{models, ConversionStatus, Credentials, PollConfig, WrapAmount, WrappedClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let amount: WrapAmount = args
        .next()
        .ok_or("usage: wrap_and_track <AMOUNT> [BASE] [WRAPPED]")?
        .parse()?;
    let base = args.next().unwrap_or_else(|| "ETH".to_string());
    let wrapped = args.next().unwrap_or_else(|| "cbETH".to_string());

    let client = WrappedClient::new(Credentials::from_env()?);

    // 1. Submit without waiting
    println!("Wrapping {amount} {base} into {wrapped}...");
    let submission = client.submit_wrap(&base, &wrapped, &amount, false).await?;
    let Some(conversion_id) = models::conversion_id(&submission) else {
        println!("No conversion id returned: {submission:?}");
        return Ok(());
    };
    println!("Conversion id: {conversion_id}");

    // 2. One manual status check
    let status = client.get_wrap_status(&conversion_id).await?;
    let state = ConversionStatus::from_payload(&status);
    println!("Current status: {state:?}");

    // 3. Poll until terminal, giving up after two minutes
    let poll = PollConfig {
        interval: Duration::from_secs(5),
        timeout: Duration::from_secs(120),
    };
    match client.wait_for_completion(&conversion_id, &poll).await {
        Ok(final_status) => {
            let state = ConversionStatus::from_payload(&final_status);
            println!("Finished: {state:?}");
        }
        Err(err) if err.is_poll_timeout() => {
            println!("Still in progress after {:?}; check again later", poll.timeout);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
