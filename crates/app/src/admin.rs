use std::error::Error;
use std::fmt;

use realm_core::model::{GameMode, ModeDetails, RecordId, Role, UserId, WordDraft, WordRecord};
use services::{AdminPanel, AdminService, Banner, Navigation};

/// The panel ended on an error banner or a sign-in redirect.
#[derive(Debug)]
pub struct PanelError(String);

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for PanelError {}

pub async fn list(admin: &AdminService, mode: GameMode, json: bool) -> Result<(), Box<dyn Error>> {
    let records = admin.list(mode).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No {} words yet.", mode.title());
    }
    for record in &records {
        println!("{}", describe(record));
    }
    Ok(())
}

pub async fn add(
    mut panel: AdminPanel,
    mode: GameMode,
    draft: WordDraft,
) -> Result<(), Box<dyn Error>> {
    panel.select_mode(mode).await;
    *panel.draft_mut() = draft;
    panel.submit().await;
    finish(&panel)
}

pub async fn delete(mut panel: AdminPanel, id: RecordId) -> Result<(), Box<dyn Error>> {
    panel.delete(id).await;
    finish(&panel)
}

pub async fn grant(admin: &AdminService, user: UserId, role: Role) -> Result<(), Box<dyn Error>> {
    admin.grant(user, role).await?;
    println!("{user} is now {role}.");
    Ok(())
}

fn finish(panel: &AdminPanel) -> Result<(), Box<dyn Error>> {
    if panel.navigation() == Some(Navigation::SignIn) {
        let reason = panel.banner().map_or("not signed in", Banner::text);
        return Err(PanelError(format!(
            "{reason}; sign in as an admin with --user or REALM_USER_ID"
        ))
        .into());
    }
    match panel.banner() {
        Some(Banner::Success(text)) => {
            println!("{text}");
            if let Some(record) = panel.records().first() {
                println!("{}", describe(record));
            }
            Ok(())
        }
        Some(banner) => Err(PanelError(banner.text().to_string()).into()),
        None => Ok(()),
    }
}

fn describe(record: &WordRecord) -> String {
    let details = match &record.details {
        ModeDetails::Wordsmith {
            component_words, ..
        } => component_words.join(" + "),
        ModeDetails::Forest { obstacle_type } => obstacle_type.to_string(),
        ModeDetails::Tower {
            floor_number,
            options,
            correct_answer,
        } => format!("floor {floor_number}: {} ({correct_answer})", options.join(", ")),
    };
    format!(
        "{}  {}  {}  [{}]  {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.word,
        details,
        record.definition
    )
}
