use super::utils::AppContext;
use antirecommender::{LoginScreen, ViewState};

pub async fn handle_register_command(
    context: &AppContext,
    email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let accounts = context.account_client();
    let mut screen = LoginScreen::new();

    println!("{}", LoginScreen::LOADING_MESSAGE);
    screen.submit(&accounts, email).await;

    if let Some(message) = screen.state().error().map(str::to_string) {
        screen.go_back(&context.session)?;
        return Err(message.into());
    }

    match screen.state() {
        ViewState::Success(()) => {
            println!("✅ {email} can now log in with the music service");
            Ok(())
        }
        _ => Err("registration did not finish".into()),
    }
}
