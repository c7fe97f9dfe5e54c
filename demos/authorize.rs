//! Walks through the three-legged OAuth dance against the account service.
//!
//! ```sh
//! ALIYUN_OAUTH_CONSUMER_KEY=... ALIYUN_OAUTH_CONSUMER_SECRET=... \
//!     RUST_LOG=aliyun_oauth1=debug cargo run --example authorize
//! ```

use std::io;

use aliyun_oauth1::Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aliyun_oauth1=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Client::from_env()?;

    // step 1: acquire request token & token secret
    let request_token = client.request_token("oob").await?;

    // step 2. acquire user verifier
    println!(
        "please access to: {}",
        client.get_authorize_url(&request_token.oauth_token)
    );
    println!("input verifier: ");
    let mut user_input = String::new();
    io::stdin().read_line(&mut user_input)?;
    let verifier = user_input.trim();

    // step 3. acquire access token
    let access = client
        .get_access_token(
            &request_token.oauth_token,
            verifier,
            &request_token.oauth_token_secret,
        )
        .await?;
    println!(
        "your token and secret is: \n token: {}\n secret: {}",
        access.oauth_token, access.oauth_token_secret
    );

    let profile = client
        .load(&access.oauth_token, &access.oauth_token_secret)
        .await?;
    println!("profile: {:#?}", profile.into_json());

    let server_time = client
        .get_timestamp(Some(&access.oauth_token_secret))
        .await?;
    println!("server time: {}", server_time.into_json()["timestamp"]);
    Ok(())
}
