//! Handler for the CSV user bulk import (`POST /users/import`).
//!
//! Rows are processed one by one: a malformed row is skipped, a row whose
//! email or residence number already exists is counted as a duplicate, and
//! processing continues either way. A row the database refuses is logged and
//! skipped as well, so the response is always a summary of the whole file.

use axum::extract::{Multipart, State};
use axum::Json;
use visitgate_core::import::{parse_csv, validate_row, ImportSummary};
use visitgate_db::models::user::CreateUser;
use visitgate_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Problem reported for a row the database rejected.
const STORAGE_ERROR: &str = "storage error";

/// POST /api/v1/users/import
///
/// Accepts a multipart upload with a `file` field holding a CSV document.
pub async fn import_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_lowercase();
        if !filename.ends_with(".csv") {
            return Err(AppError::BadRequest(
                "Only CSV files are supported. Export spreadsheets as CSV first.".into(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(data);
        break;
    }

    let data = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{FILE_FIELD}' field in multipart upload"))
    })?;

    let rows = parse_csv(&data)?;
    let mut summary = ImportSummary::new(rows.len());

    for (row_number, row) in &rows {
        let validated = match validate_row(row) {
            Ok(v) => v,
            Err(problems) => {
                summary.record_skipped(*row_number, &problems);
                continue;
            }
        };
        let account = &validated.account;

        let conflict =
            UserRepo::find_conflict(&state.pool, &account.email, &account.residence_number, None)
                .await;
        let conflict = match conflict {
            Ok(conflict) => conflict,
            Err(e) => {
                tracing::error!(row = row_number, error = %e, "Import row lookup failed");
                summary.record_skipped(*row_number, &[STORAGE_ERROR.to_string()]);
                continue;
            }
        };
        if conflict.is_some() {
            summary.record_duplicate(
                *row_number,
                &format!(
                    "user already exists (email: {}, residence: {})",
                    account.email, account.residence_number
                ),
            );
            continue;
        }

        let password_hash = hash_password(&validated.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let created = UserRepo::create(
            &state.pool,
            &CreateUser {
                residence_number: account.residence_number.clone(),
                email: account.email.clone(),
                phone: account.phone.clone(),
                password_hash,
                role: validated.role,
            },
        )
        .await;

        match created {
            Ok(user) => {
                tracing::debug!(
                    user_id = user.id,
                    row = row_number,
                    generated_password = validated.password_generated,
                    "Imported user"
                );
                summary.record_success();
            }
            // Lost a race with a concurrent insert of the same account.
            Err(e)
                if is_unique_violation(&e, "uq_users_email")
                    || is_unique_violation(&e, "uq_users_residence_number") =>
            {
                summary.record_duplicate(*row_number, "user already exists");
            }
            Err(e) => {
                tracing::error!(row = row_number, error = %e, "Import row insert failed");
                summary.record_skipped(*row_number, &[STORAGE_ERROR.to_string()]);
            }
        }
    }

    tracing::info!(
        admin_id = admin.user_id,
        total = summary.total,
        success = summary.success,
        duplicates = summary.duplicates,
        skipped = summary.skipped,
        "User import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}
