//! Expenses API endpoints

use api_types::{
    Message,
    expense::{
        Categories, ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView, MonthlySummaryView,
        RawField, Total,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{ExpenseDraft, ExpenseFilter, FieldValue};

use crate::{ServerError, server::ServerState};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        product_name: expense.product_name,
        amount: expense.amount,
        category: expense.category,
        date: expense.date,
    }
}

fn map_summary(summary: engine::MonthlySummary) -> MonthlySummaryView {
    MonthlySummaryView {
        month: summary.month,
        total: summary.total,
        count: summary.count,
        categories: summary.categories,
    }
}

fn map_field(field: RawField) -> FieldValue {
    match field {
        RawField::Number(number) => FieldValue::Number(number),
        RawField::Text(text) => FieldValue::Text(text),
        RawField::Other(_) => FieldValue::Unsupported,
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::Malformed(rejection.body_text()))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let filter = ExpenseFilter { month: query.month };
    let expenses = state
        .engine
        .list_expenses(&filter)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn add(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let payload = body(payload)?;
    let expense = state
        .engine
        .add_expense(ExpenseDraft {
            product_name: payload.product_name.map(map_field),
            amount: payload.amount.map(map_field),
            category: payload.category.map(map_field),
            date: payload.date.map(map_field),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<Message>, ServerError> {
    let payload = body(payload)?;
    let draft = ExpenseDraft {
        product_name: payload.product_name.map(map_field),
        amount: payload.amount.map(map_field),
        category: payload.category.map(map_field),
        date: payload.date.map(map_field),
    };
    state.engine.update_expense(&id, draft).await?;
    Ok(Json(Message::new("Expense updated successfully")))
}

pub async fn total(State(state): State<ServerState>) -> Result<Json<Total>, ServerError> {
    let total = state.engine.get_total().await?;
    Ok(Json(Total { total }))
}

pub async fn categories() -> Json<Categories> {
    Json(Categories {
        categories: engine::SUGGESTED_CATEGORIES
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

pub async fn monthly(
    State(state): State<ServerState>,
) -> Result<Json<Vec<MonthlySummaryView>>, ServerError> {
    let months = state
        .engine
        .monthly_summary()
        .await?
        .into_iter()
        .map(map_summary)
        .collect();
    Ok(Json(months))
}

pub async fn reset(State(state): State<ServerState>) -> Result<Json<Message>, ServerError> {
    state.engine.reset_expenses().await?;
    Ok(Json(Message::new("All expenses deleted successfully")))
}

pub async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_expense(&id).await?;
    Ok(Json(Message::new("Expense deleted successfully")))
}
