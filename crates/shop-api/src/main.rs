//! # Storefront
//!
//! Checkout and Razorpay payment server.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//! export RAZORPAY_WEBHOOK_SECRET=...
//!
//! # Run the server
//! storefront
//! ```

use shop_api::{routes, state::AppState};
use shop_razorpay::SUBSCRIBED_WEBHOOK_EVENTS;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.payments.provider_name());
    info!(
        "Minimum order total: {}",
        state.checkout.settings().minimum_order_total
    );

    let app = routes::create_router(state.clone());

    info!("Storefront starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Callback: POST {}/payment/handler", state.config.base_url);
        info!(
            "Webhook: POST {}/webhook/razorpay (events: {})",
            state.config.base_url,
            SUBSCRIBED_WEBHOOK_EVENTS.join(", ")
        );
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout + Razorpay payments
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
