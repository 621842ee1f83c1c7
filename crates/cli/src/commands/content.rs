//! Read-only content commands.

use std::io::Write;

use tracing::info;

use poppin_deli_storefront::AppState;
use poppin_deli_storefront::content::{MenuFilter, MenuItem, ReviewSummary};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print the menu grouped by category.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn menu(state: &AppState, search: Option<String>, tags: Vec<String>) -> CommandResult {
    let menu = state.content().menu().await;
    let filter = MenuFilter { search, tags };
    let sections = menu.sections(&filter);

    let mut out = std::io::stdout().lock();
    if sections.is_empty() {
        writeln!(out, "No items found. Try adjusting your search or filters.")?;
        return Ok(());
    }

    for section in sections {
        writeln!(out, "== {} ==", section.category.name)?;
        for item in section.items {
            write_item(&mut out, item)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_item(out: &mut impl Write, item: &MenuItem) -> std::io::Result<()> {
    let veg = if item.is_veg { " (veg)" } else { "" };
    writeln!(out, "  [{}] {}{veg} - {}", item.id, item.name, item.price)?;
    if !item.description.is_empty() {
        writeln!(out, "      {}", item.description)?;
    }
    if !item.tags.is_empty() {
        writeln!(out, "      tags: {}", item.tags.join(", "))?;
    }
    Ok(())
}

/// Print the live status and site contact details.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn status(state: &AppState) -> CommandResult {
    let status = state.content().status().await;
    let settings = state.content().site_settings().await;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{} [{}]", status.label, status.status)?;
    if !status.note.is_empty() {
        writeln!(out, "{}", status.note)?;
    }
    if status.wait_time > 0 {
        writeln!(out, "Wait: ~{} min", status.wait_time)?;
    }
    if !status.suggestion.is_empty() && status.suggestion != status.note {
        writeln!(out, "Tip: {}", status.suggestion)?;
    }
    writeln!(out)?;
    for (key, value) in settings.iter() {
        writeln!(out, "{key}: {value}")?;
    }
    if !state.content().is_configured() {
        writeln!(out)?;
        writeln!(out, "(live sheets not configured; showing bundled data)")?;
    }
    Ok(())
}

/// Print signature picks, today's special and the home page favourites.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn specials(state: &AppState) -> CommandResult {
    let content = state.content();
    let menu = content.menu().await;
    let specials = content.specials().await;
    let brewing = content.now_brewing().await;

    let mut out = std::io::stdout().lock();

    if let Some(pick) = brewing.as_ref().and_then(|b| menu.resolve_now_brewing(b)) {
        writeln!(out, "Now brewing: {} - {} ({})", pick.item.name, pick.item.price, pick.label)?;
        writeln!(out)?;
    }

    let picks = menu.resolve_specials(&specials);
    if !picks.is_empty() {
        writeln!(out, "Signature picks:")?;
        for pick in picks {
            writeln!(out, "  [{}] {} - {} ({})", pick.item.id, pick.item.name, pick.item.price, pick.label)?;
        }
        writeln!(out)?;
    }

    let featured = menu.featured_picks();
    if !featured.is_empty() {
        writeln!(out, "Favourites:")?;
        for pick in featured {
            writeln!(out, "  [{}] {} - {} ({})", pick.item.id, pick.item.name, pick.item.price, pick.label)?;
        }
    }
    Ok(())
}

/// Print reviews with their average rating.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn reviews(state: &AppState) -> CommandResult {
    let reviews = state.content().reviews().await;
    let mut out = std::io::stdout().lock();

    if reviews.is_empty() {
        writeln!(out, "No reviews yet.")?;
        return Ok(());
    }

    let summary = ReviewSummary::from_reviews(&reviews);
    writeln!(out, "Rated {} from {} reviews", summary.average, summary.count)?;
    writeln!(out)?;
    for review in reviews.iter().take(6) {
        let stars = "★".repeat(usize::from(review.stars()));
        writeln!(out, "({}) {} {stars}", review.initial(), review.name)?;
        writeln!(out, "  \"{}\"", review.text)?;
    }
    Ok(())
}

/// Remove every cached feed.
pub async fn clear_cache(state: &AppState) {
    state.content().clear_cache().await;
    info!("Cache cleared");
}
