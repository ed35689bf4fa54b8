//! File attachments travel to the backend as base64 text inside the JSON
//! payload, alongside the original filename. Only one attachment exists
//! per draft; selecting a new file replaces the previous one.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::models::ProductDraft;

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn attach_bytes(draft: &mut ProductDraft, file_name: &str, bytes: &[u8]) {
    draft.attachment = Some(encode_bytes(bytes));
    draft.attachment_file_name = Some(file_name.to_string());
}

/// Read a file and place its encoded content into the draft. The draft is
/// only touched after the read succeeds; a failed read leaves any
/// previously selected attachment exactly as it was.
pub async fn attach_file(draft: &mut ProductDraft, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment: {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    attach_bytes(draft, &file_name, &bytes);
    Ok(())
}

pub fn clear_attachment(draft: &mut ProductDraft) {
    draft.attachment = None;
    draft.attachment_file_name = None;
}
