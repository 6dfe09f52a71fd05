//! # Cashier Register Entry Point
//!
//! Runs the register session over stdin/stdout.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging, to stderr)
//! 2. Load configuration and resolve the database path
//! 3. Connect to database & run migrations
//! 4. Spawn the write queue and hydrate the session
//! 5. Serve JSON commands until stdin closes
//! 6. Drain pending writes and close the database

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = cashier_register::run().await {
        eprintln!("cashier-register: {e}");
        std::process::exit(1);
    }
}
