//! 식단 기록 CRUD 핸들러
//!
//! 모든 경로는 두 게이트(API Key + JWT)를 통과해야 합니다.
//! 레코드의 소유자는 생성 시 인증된 사용자로 한 번 기록되고, 이후 모든
//! 접근은 소유권 검사를 거칩니다. 존재 확인이 소유권 검사보다 먼저입니다
//! (404가 소유자 정보를 드러내지 않도록).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use mealtrack_core::auth::{ownership, UserId};

use crate::db::MealRow;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// 식단 기록 생성/수정 요청 본문
#[derive(Debug, Deserialize)]
pub struct MealInput {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub protein: f64,

    #[serde(default)]
    pub carb: f64,

    #[serde(default)]
    pub fat: f64,

    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

/// 식단 기록 생성
///
/// 소유자는 본문이 아니라 인증된 사용자로 결정됩니다.
pub async fn create_meal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<MealInput>,
) -> Result<(StatusCode, Json<MealRow>)> {
    validate_input(&input)?;

    let meal = state
        .db
        .insert_meal(
            user.as_str(),
            input.name.trim(),
            input.protein,
            input.carb,
            input.fat,
            &input.date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(meal)))
}

/// 식단 기록 목록 조회 (요청자 소유분만, 날짜 필터 옵션)
pub async fn list_meals(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MealRow>>> {
    if let Some(date) = &query.date {
        validate_date(date)?;
    }

    let meals = state.db.list_meals(user.as_str(), query.date.as_deref()).await?;
    Ok(Json(meals))
}

/// 식단 기록 단건 조회
pub async fn get_meal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(meal_id): Path<String>,
) -> Result<Json<MealRow>> {
    let meal = load_owned_meal(&state, &meal_id, &user).await?;
    Ok(Json(meal))
}

/// 식단 기록 수정
pub async fn update_meal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(meal_id): Path<String>,
    Json(input): Json<MealInput>,
) -> Result<Json<MealRow>> {
    load_owned_meal(&state, &meal_id, &user).await?;
    validate_input(&input)?;

    let updated = state
        .db
        .update_meal(
            &meal_id,
            input.name.trim(),
            input.protein,
            input.carb,
            input.fat,
            &input.date,
        )
        .await?
        .ok_or_else(meal_not_found)?;

    Ok(Json(updated))
}

/// 식단 기록 삭제
pub async fn delete_meal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(meal_id): Path<String>,
) -> Result<StatusCode> {
    load_owned_meal(&state, &meal_id, &user).await?;

    state.db.delete_meal(&meal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 존재 확인(404) 후 소유권 검사(403)를 거쳐 레코드를 로드
async fn load_owned_meal(
    state: &AppState,
    meal_id: &str,
    user: &UserId,
) -> Result<MealRow> {
    let meal = state
        .db
        .find_meal(meal_id)
        .await?
        .ok_or_else(meal_not_found)?;

    ownership::authorize_owner(user, &UserId::new(meal.user_id.as_str()))?;

    Ok(meal)
}

fn validate_input(input: &MealInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Name is required"));
    }
    if input.date.trim().is_empty() {
        return Err(bad_request("Date is required"));
    }
    validate_date(&input.date)?;
    if input.protein < 0.0 || input.carb < 0.0 || input.fat < 0.0 {
        return Err(bad_request("Nutritional values cannot be negative"));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| bad_request("Invalid date format"))
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest {
        message: message.to_string(),
    }
}

fn meal_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Meal not found".to_string(),
    }
}
