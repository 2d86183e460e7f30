pub mod recommend;
pub mod recommend_output;
pub mod register;
pub mod utils;

use antirecommender::Route;
use clap::Subcommand;
use utils::AppContext;

#[derive(Subcommand)]
pub enum Commands {
    /// Show what the saved session knows about you
    Status,

    /// Add your email to the backend's allowed users
    ///
    /// Usage examples:
    /// # Register before logging in with the music service
    /// antirecommender register you@example.com
    Register {
        /// Email address to allow-list
        email: String,
    },

    /// Log in with the music service and fetch a recommendation
    ///
    /// The first run prints the authorization URL to open in a browser.
    /// After accepting, pass the URL the browser was redirected to.
    ///
    /// Usage examples:
    /// # Start the authorization
    /// antirecommender recommend
    ///
    /// # Finish it with the redirect URL and show the second page of songs
    /// antirecommender recommend --callback "http://localhost:5173/?code=..." --page 2
    ///
    /// # Print the result as a JSON envelope
    /// antirecommender recommend --json
    Recommend {
        /// URL the music service redirected the browser to
        #[arg(long)]
        callback: Option<String>,

        /// Page of the listening history to show (1-based)
        #[arg(long)]
        page: Option<usize>,

        /// Print `{isError, error | value}` JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Go to whichever screen the saved session leads to
    Start {
        /// Email to register with when there is no account yet
        #[arg(long)]
        email: Option<String>,

        /// URL the music service redirected the browser to
        #[arg(long)]
        callback: Option<String>,
    },

    /// Forget the backend account and the music-service login
    Logout,
}

pub async fn execute_command(
    command: Commands,
    context: &AppContext,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Status => {
            let session = &context.session;
            println!("[{}]", utils::start_label(session));
            match session.backend_account() {
                Some(email) => println!("Registered as: {email}"),
                None => println!("Registered as: (nobody)"),
            }
            println!(
                "Music service: {}",
                if session.has_service_auth() {
                    "logged in"
                } else {
                    "not logged in"
                }
            );
            println!("Next screen: {:?}", session.route());
            Ok(())
        }

        Commands::Register { email } => register::handle_register_command(context, &email).await,

        Commands::Recommend {
            callback,
            page,
            json,
        } => recommend::handle_recommend_command(context, callback.as_deref(), page, json).await,

        Commands::Start { email, callback } => {
            let route = context.session.route();
            log::debug!("Session routes to {route:?}");

            if route == Route::Registration {
                let Some(email) = email else {
                    println!("[{}]", utils::start_label(&context.session));
                    println!("Register first: antirecommender start --email you@example.com");
                    return Ok(());
                };
                register::handle_register_command(context, &email).await?;
            }

            recommend::handle_recommend_command(context, callback.as_deref(), None, false).await
        }

        Commands::Logout => {
            context.session.logout()?;
            println!("Logged out");
            Ok(())
        }
    }
}
