use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sea_orm::Database;

use engine::{
    Backend, Engine, EngineError, ExpenseDraft, ExpenseFilter,
    store::{DatabaseStore, MemoryStore},
};
use migration::MigratorTrait;

async fn durable_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .store(Arc::new(DatabaseStore::new(db)))
        .build()
}

fn fallback_engine() -> Engine {
    Engine::builder().store(Arc::new(MemoryStore::new())).build()
}

/// One engine per backend; every property must hold for both.
async fn engines() -> Vec<Engine> {
    vec![durable_engine().await, fallback_engine()]
}

fn draft(name: &str, amount: f64, category: Option<&str>) -> ExpenseDraft {
    ExpenseDraft {
        product_name: Some(name.into()),
        amount: Some(amount.into()),
        category: category.map(Into::into),
        date: None,
    }
}

#[tokio::test]
async fn add_then_list_returns_the_record_with_a_fresh_id() {
    for engine in engines().await {
        let before = Utc::now();
        let first = engine
            .add_expense(draft("Coffee", 3.5, Some("Food")))
            .await
            .unwrap();
        let second = engine
            .add_expense(draft("Bus", 2.0, Some("Travel")))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.date >= before && first.date <= Utc::now());

        let listed = engine.list_expenses(&ExpenseFilter::default()).await.unwrap();
        let matching: Vec<_> = listed.iter().filter(|e| e.id == first.id).collect();
        assert_eq!(matching.len(), 1, "backend {}", engine.backend());
        assert_eq!(matching[0].product_name, "Coffee");
        assert_eq!(matching[0].amount, 3.5);
        assert_eq!(matching[0].category, "Food");
    }
}

#[tokio::test]
async fn category_defaults_to_others() {
    for engine in engines().await {
        let expense = engine.add_expense(draft("Gift", 20.0, None)).await.unwrap();
        assert_eq!(expense.category, "Others");
    }
}

#[tokio::test]
async fn total_follows_adds_and_resets() {
    for engine in engines().await {
        engine.reset_expenses().await.unwrap();
        assert_eq!(engine.get_total().await.unwrap(), 0.0);

        engine.add_expense(draft("Lunch", 10.50, None)).await.unwrap();
        engine.add_expense(draft("Snack", 5.25, None)).await.unwrap();
        assert_eq!(engine.get_total().await.unwrap(), 15.75);
    }
}

#[tokio::test]
async fn delete_succeeds_exactly_once() {
    for engine in engines().await {
        let expense = engine.add_expense(draft("Coffee", 3.5, None)).await.unwrap();
        engine.delete_expense(&expense.id).await.unwrap();
        let err = engine.delete_expense(&expense.id).await.unwrap_err();
        assert_eq!(err, EngineError::NotFound("Expense not found".to_string()));
    }
}

#[tokio::test]
async fn update_changes_only_the_supplied_field() {
    for engine in engines().await {
        let date = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        let expense = engine
            .add_expense(ExpenseDraft {
                date: Some(date.into()),
                ..draft("Train", 12.0, Some("Bills"))
            })
            .await
            .unwrap();

        let patch = ExpenseDraft {
            category: Some("Travel".into()),
            ..Default::default()
        };
        engine.update_expense(&expense.id, patch).await.unwrap();

        let listed = engine.list_expenses(&ExpenseFilter::default()).await.unwrap();
        let updated = listed.iter().find(|e| e.id == expense.id).unwrap();
        assert_eq!(updated.category, "Travel");
        assert_eq!(updated.product_name, "Train");
        assert_eq!(updated.amount, 12.0);
        assert_eq!(updated.date, date);
    }
}

#[tokio::test]
async fn update_without_changes_is_reported_as_not_found() {
    for engine in engines().await {
        let expense = engine
            .add_expense(draft("Coffee", 3.5, Some("Food")))
            .await
            .unwrap();
        let patch = ExpenseDraft {
            category: Some("Food".into()),
            ..Default::default()
        };
        let err = engine.update_expense(&expense.id, patch).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::NotFound("Expense not found or no changes made".to_string())
        );
    }
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    for engine in engines().await {
        let missing = match engine.backend() {
            Backend::Durable => "0123456789abcdef0123456789abcdef",
            Backend::Fallback => "4242",
        };
        let patch = ExpenseDraft {
            amount: Some(1.0.into()),
            ..Default::default()
        };
        let err = engine.update_expense(missing, patch).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}

#[tokio::test]
async fn malformed_ids_are_caller_errors() {
    for engine in engines().await {
        let err = engine.delete_expense("not an id").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidId(_)));

        let patch = ExpenseDraft {
            amount: Some(1.0.into()),
            ..Default::default()
        };
        let err = engine.update_expense("not an id", patch).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidId(_)));
    }
}

#[tokio::test]
async fn invalid_amounts_are_rejected_without_writing() {
    for engine in engines().await {
        for amount in [0.0, -5.0] {
            let err = engine
                .add_expense(draft("Coffee", amount, None))
                .await
                .unwrap_err();
            let EngineError::Validation(errors) = err else {
                panic!("expected validation error");
            };
            assert!(errors.get("amount").is_some());
        }
        let listed = engine.list_expenses(&ExpenseFilter::default()).await.unwrap();
        assert!(listed.is_empty());
    }
}

#[tokio::test]
async fn invalid_patch_is_rejected() {
    for engine in engines().await {
        let expense = engine.add_expense(draft("Coffee", 3.5, None)).await.unwrap();
        let patch = ExpenseDraft {
            amount: Some((-1.0).into()),
            ..Default::default()
        };
        let err = engine.update_expense(&expense.id, patch).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(engine.get_total().await.unwrap(), 3.5);
    }
}

#[tokio::test]
async fn reset_empties_the_collection() {
    for engine in engines().await {
        engine.add_expense(draft("Coffee", 3.5, None)).await.unwrap();
        engine.add_expense(draft("Bus", 2.0, None)).await.unwrap();
        engine.reset_expenses().await.unwrap();
        assert!(engine
            .list_expenses(&ExpenseFilter::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(engine.get_total().await.unwrap(), 0.0);
    }
}

#[tokio::test]
async fn coffee_and_bus_scenario() {
    for engine in engines().await {
        let coffee = engine
            .add_expense(draft("Coffee", 3.50, Some("Food")))
            .await
            .unwrap();
        let bus = engine
            .add_expense(draft("Bus", 2.00, Some("Travel")))
            .await
            .unwrap();
        assert_ne!(coffee.id, bus.id);
        assert_eq!(engine.get_total().await.unwrap(), 5.50);

        engine.delete_expense(&coffee.id).await.unwrap();
        assert_eq!(engine.get_total().await.unwrap(), 2.00);

        let listed = engine.list_expenses(&ExpenseFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_name, "Bus");
    }
}

#[tokio::test]
async fn list_filters_by_month() {
    for engine in engines().await {
        let march = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap();
        for (name, date) in [("Rent", march), ("Phone", april)] {
            engine
                .add_expense(ExpenseDraft {
                    date: Some(date.into()),
                    ..draft(name, 100.0, Some("Bills"))
                })
                .await
                .unwrap();
        }

        let filter = ExpenseFilter {
            month: Some("2025-04".to_string()),
        };
        let listed = engine.list_expenses(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_name, "Phone");

        let filter = ExpenseFilter {
            month: Some("April".to_string()),
        };
        let err = engine.list_expenses(&filter).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn monthly_summary_groups_by_month_and_category() {
    for engine in engines().await {
        let feb = Utc.with_ymd_and_hms(2025, 2, 20, 8, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        for (name, amount, category, date) in [
            ("Groceries", 40.0, "Food", feb),
            ("Taxi", 15.0, "Travel", feb),
            ("Dinner", 25.0, "Food", mar),
            ("Lunch", 10.0, "Food", mar),
        ] {
            engine
                .add_expense(ExpenseDraft {
                    date: Some(date.into()),
                    ..draft(name, amount, Some(category))
                })
                .await
                .unwrap();
        }

        let summary = engine.monthly_summary().await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].month, "2025-02");
        assert_eq!(summary[0].total, 55.0);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].categories["Travel"], 15.0);
        assert_eq!(summary[1].month, "2025-03");
        assert_eq!(summary[1].categories["Food"], 35.0);
        assert_eq!(summary[1].categories.len(), 1);
    }
}

#[tokio::test]
async fn durable_ids_accept_hyphenated_spelling() {
    let engine = durable_engine().await;
    let expense = engine.add_expense(draft("Coffee", 3.5, None)).await.unwrap();
    assert_eq!(expense.id.len(), 32);

    let hyphenated = uuid_hyphenated(&expense.id);
    engine.delete_expense(&hyphenated).await.unwrap();
    assert_eq!(engine.get_total().await.unwrap(), 0.0);
}

fn uuid_hyphenated(simple: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &simple[0..8],
        &simple[8..12],
        &simple[12..16],
        &simple[16..20],
        &simple[20..32]
    )
}
