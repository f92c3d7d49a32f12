//! Profile view and update handlers.
//!
//! Updates arrive as urlencoded forms or multipart (when a new avatar is
//! attached). Only fields present in the request change; a checkbox field
//! must be sent explicitly (`on`/`off`) to change its flag.

use std::collections::HashMap;

use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chatdesk_types::profile::{FontSize, ProfileUpdate, Theme};
use chatdesk_types::user::validate_person_name;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::state::AppState;

/// Multipart field carrying the avatar image.
const PICTURE_FIELD: &str = "profile_picture";

/// Page browsers are sent back to after a form submit.
const PROFILE_PAGE: &str = "/profile";

/// Decoded update request: text fields plus an optional uploaded file.
#[derive(Debug, Default)]
struct ProfileForm {
    fields: HashMap<String, String>,
    picture: Option<(String, Vec<u8>)>,
}

/// GET /api/v1/profile - The caller's account, preferences and the allowed choices.
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = state.profiles.get_or_create(&user.id).await?;
    Ok(Json(json!({
        "user": user,
        "profile": profile,
        "theme_choices": choices(&Theme::CHOICES),
        "font_size_choices": choices(&FontSize::CHOICES),
    })))
}

/// POST /api/v1/profile - Apply a partial profile update.
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    request: Request,
) -> Result<Response, AppError> {
    let form = read_profile_form(request, &state).await?;
    // Everything is validated before the first write.
    let mut update = profile_update(&form.fields)?;
    let first_name = form.fields.get("first_name").cloned();
    let last_name = form.fields.get("last_name").cloned();
    for name in [&first_name, &last_name].into_iter().flatten() {
        validate_person_name(name).map_err(AppError::Validation)?;
    }

    let previous_image = state.profiles.get_or_create(&user.id).await?.profile_image;
    if let Some((file_name, bytes)) = &form.picture {
        update.profile_image = Some(state.avatars.save(user.id, file_name, bytes).await?);
    }
    let new_image = update.profile_image.clone();

    let profile = match state.profiles.update(&user.id, update).await {
        Ok(profile) => profile,
        Err(e) => {
            if let Some(path) = &new_image {
                state.avatars.remove(path).await;
            }
            return Err(e.into());
        }
    };
    if let (Some(old), Some(new)) = (&previous_image, &profile.profile_image) {
        if new_image.is_some() && old != new {
            state.avatars.remove(old).await;
        }
    }
    state
        .auth
        .update_names(&user.id, first_name, last_name)
        .await?;

    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    if is_xhr {
        Ok(Json(json!({ "status": "success" })).into_response())
    } else {
        Ok((StatusCode::SEE_OTHER, [(LOCATION, PROFILE_PAGE)]).into_response())
    }
}

async fn read_profile_form(request: Request, state: &AppState) -> Result<ProfileForm, AppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, state).await?;
        return Ok(ProfileForm {
            fields,
            picture: None,
        });
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?;

    let mut form = ProfileForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == PICTURE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?;
            // Browsers submit an empty, unnamed part when no file was chosen.
            if !file_name.is_empty() || !bytes.is_empty() {
                form.picture = Some((file_name, bytes.to_vec()));
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid form field: {}", e.body_text())))?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

/// Build a partial update from the submitted text fields.
fn profile_update(fields: &HashMap<String, String>) -> Result<ProfileUpdate, AppError> {
    let theme = fields
        .get("theme")
        .map(|v| v.parse::<Theme>())
        .transpose()
        .map_err(AppError::Validation)?;
    let font_size = fields
        .get("font_size")
        .map(|v| v.parse::<FontSize>())
        .transpose()
        .map_err(AppError::Validation)?;

    let update = ProfileUpdate {
        bio: fields.get("bio").cloned(),
        theme,
        font_size,
        email_notifications: checkbox(fields, "email_notifications")?,
        show_typing_status: checkbox(fields, "show_typing_status")?,
        profile_image: None,
    };
    update.validate().map_err(AppError::Validation)?;
    Ok(update)
}

fn checkbox(fields: &HashMap<String, String>, name: &str) -> Result<Option<bool>, AppError> {
    let Some(value) = fields.get(name) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(Some(true)),
        "off" | "false" | "0" => Ok(Some(false)),
        other => Err(AppError::Validation(format!(
            "invalid value for {name}: '{other}'"
        ))),
    }
}

fn choices(pairs: &[(&str, &str)]) -> Vec<serde_json::Value> {
    pairs
        .iter()
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect()
}
