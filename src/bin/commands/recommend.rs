use super::recommend_output as output;
use super::utils::AppContext;
use antirecommender::{RecommendationsScreen, ResultEnvelope, ViewState};

pub async fn handle_recommend_command(
    context: &AppContext,
    callback: Option<&str>,
    page: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = context.orchestrator();
    let mut screen = RecommendationsScreen::new();

    if !json {
        println!("{}", RecommendationsScreen::LOADING_MESSAGE);
    }
    match callback {
        Some(redirect_url) => screen.mount_from_redirect(&orchestrator, redirect_url).await,
        None => screen.mount(&orchestrator, None).await,
    };

    if let Some(redirect) = screen.redirect() {
        output::print_redirect(&redirect.url, json);
        return Ok(());
    }

    if let Some(page) = page {
        screen.go_to_page(page.saturating_sub(1));
    }

    if let Some(message) = screen.state().error().map(str::to_string) {
        // Leaving the error screen logs out, so the next run starts clean
        screen.go_back(&context.session)?;
        if json {
            output::print_envelope(&ResultEnvelope::<()>::err(message));
            return Ok(());
        }
        return Err(message.into());
    }

    match (screen.state(), screen.view()) {
        (ViewState::Success(recommender), Some(view)) => {
            if json {
                output::print_envelope(&ResultEnvelope::ok(recommender));
            } else {
                println!("{view}");
            }
            Ok(())
        }
        _ => Err("the recommendation did not finish loading".into()),
    }
}
