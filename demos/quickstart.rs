/// Quickstart example: look up a wrapped-asset conversion rate.
///
/// Reads credentials from `COINBASE_API_KEY` / `COINBASE_API_SECRET`.
/// Usage: cargo run --example quickstart -- [BASE] [WRAPPED]
use coinbase_wrapped::{Credentials, WrappedClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let base = args.next().unwrap_or_else(|| "ETH".to_string());
    let wrapped = args.next().unwrap_or_else(|| "cbETH".to_string());

    // 1. Build a client from the environment
    let client = WrappedClient::new(Credentials::from_env()?);
    println!("Using https://api.coinbase.{}", client.domain());

    // 2. Fetch the rate for the pair
    match client.get_conversion_rate(&base, &wrapped).await? {
        Some(rate) => println!("1 {base} = {rate} {wrapped}"),
        None => println!("No pricing listed for {base} -> {wrapped}"),
    }

    Ok(())
}
