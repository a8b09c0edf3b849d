use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AnalysisConfig, Engine, EngineError, MatchType, MoneyCents, NewTransaction,
    TransactionFilter, UserRole,
};
use migration::MigratorTrait;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn engine_with_db(analysis: AnalysisConfig) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .analysis(analysis)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_from(start: &str) -> Engine {
    engine_with_db(AnalysisConfig::from_setting(Some(start))).await.0
}

fn rent(user_id: Uuid, amount: i64, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        amount: MoneyCents::new(amount),
        date: on,
        description: "BANK TRANSFER RENT".to_string(),
        category: None,
        user_id: Some(user_id),
        match_type: MatchType::RentPayment,
        match_confidence: Some(0.95),
    }
}

fn expense(amount: i64, on: NaiveDate, category: &str) -> NewTransaction {
    NewTransaction {
        amount: MoneyCents::new(amount),
        date: on,
        description: "CARD PAYMENT".to_string(),
        category: Some(category.to_string()),
        user_id: None,
        match_type: MatchType::Expense,
        match_confidence: None,
    }
}

#[tokio::test]
async fn weekly_payment_on_thursday_settles_the_week() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    engine
        .add_schedule(alice, MoneyCents::new(250_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();
    // Thursday of the week starting Monday 2024-01-08.
    engine
        .record_transaction(rent(alice, 250_00, date(2024, 1, 11)))
        .await
        .unwrap();

    let balance = engine
        .flatmate_balance(alice, date(2024, 1, 14))
        .await
        .unwrap()
        .unwrap();

    let week = balance
        .weekly_breakdown
        .iter()
        .find(|w| w.week_start == date(2024, 1, 8))
        .unwrap();
    assert_eq!(week.amount_due, MoneyCents::new(250_00));
    assert_eq!(week.amount_paid, MoneyCents::new(250_00));
    assert_eq!(week.balance, MoneyCents::ZERO);

    // The week of 2024-01-01 was never paid.
    assert_eq!(balance.total_due, MoneyCents::new(500_00));
    assert_eq!(balance.total_paid, MoneyCents::new(250_00));
    assert_eq!(balance.balance, MoneyCents::new(-250_00));
}

#[tokio::test]
async fn overlapping_schedules_use_latest_start() {
    let engine = engine_from("2024-02-26").await;
    let bob = engine.create_user("Bob", None, UserRole::Member).await.unwrap();
    engine
        .add_schedule(bob, MoneyCents::new(200_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();
    engine
        .add_schedule(bob, MoneyCents::new(300_00), date(2024, 3, 1), None, Some("rent rise"))
        .await
        .unwrap();

    let balance = engine
        .flatmate_balance(bob, date(2024, 3, 10))
        .await
        .unwrap()
        .unwrap();

    let week = balance
        .weekly_breakdown
        .iter()
        .find(|w| w.week_start == date(2024, 3, 4))
        .unwrap();
    assert_eq!(week.amount_due, MoneyCents::new(300_00));
    assert_eq!(balance.total_due, MoneyCents::new(500_00));
}

#[tokio::test]
async fn no_transactions_means_balance_is_minus_total_due() {
    let engine = engine_from("2024-01-01").await;
    let carol = engine
        .create_user("Carol", Some("carol@example.com"), UserRole::Admin)
        .await
        .unwrap();
    engine
        .add_schedule(carol, MoneyCents::new(180_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();

    let balance = engine
        .flatmate_balance(carol, date(2024, 2, 1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(balance.total_paid, MoneyCents::ZERO);
    assert!(balance.total_due.is_positive());
    assert_eq!(balance.balance, -balance.total_due);
}

#[tokio::test]
async fn unknown_user_yields_none_and_is_omitted_from_batches() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();

    assert!(
        engine
            .flatmate_balance(Uuid::new_v4(), date(2024, 2, 1))
            .await
            .unwrap()
            .is_none()
    );

    let balances = engine
        .flatmate_balances(&[Uuid::new_v4(), alice], date(2024, 2, 1))
        .await
        .unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, alice);
}

#[tokio::test]
async fn household_summary_includes_admins_and_sums_totals() {
    let engine = engine_from("2024-01-01").await;
    let admin = engine
        .create_user("Dana", None, UserRole::Admin)
        .await
        .unwrap();
    let member = engine
        .create_user("Eve", None, UserRole::Member)
        .await
        .unwrap();
    for user in [admin, member] {
        engine
            .add_schedule(user, MoneyCents::new(100_00), date(2024, 1, 1), None, None)
            .await
            .unwrap();
    }
    engine
        .record_transaction(rent(admin, 200_00, date(2024, 1, 4)))
        .await
        .unwrap();
    engine
        .record_transaction(rent(member, 100_00, date(2024, 1, 11)))
        .await
        .unwrap();

    let summary = engine.household_summary(date(2024, 1, 14)).await.unwrap();

    assert_eq!(summary.flatmates.len(), 2);
    assert_eq!(summary.total_due, MoneyCents::new(400_00));
    assert_eq!(summary.total_paid, MoneyCents::new(300_00));
    assert_eq!(summary.total_balance, MoneyCents::new(-100_00));
    let per_user: MoneyCents = summary.flatmates.iter().map(|f| f.balance).sum();
    assert_eq!(per_user, summary.total_balance);
}

#[tokio::test]
async fn payments_before_analysis_start_are_ignored() {
    let engine = engine_from("2024-02-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    engine
        .add_schedule(alice, MoneyCents::new(100_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();
    engine
        .record_transaction(rent(alice, 100_00, date(2024, 1, 25)))
        .await
        .unwrap();

    let balance = engine
        .flatmate_balance(alice, date(2024, 2, 4))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(balance.total_paid, MoneyCents::ZERO);
    // Week of Monday 2024-01-29 (due 02-01) is the first one.
    assert_eq!(balance.weekly_breakdown[0].week_start, date(2024, 1, 29));
}

#[tokio::test]
async fn invalid_configured_start_falls_back_to_default_lookback() {
    let (engine, _db) = engine_with_db(AnalysisConfig::from_setting(Some("not-a-date"))).await;
    assert_eq!(engine.analysis().start_date, None);

    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    let today = date(2024, 7, 1);
    let old = date(2023, 12, 1);
    engine
        .record_transaction(rent(alice, 100_00, old))
        .await
        .unwrap();

    let balance = engine
        .flatmate_balance(alice, today)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.total_paid, MoneyCents::ZERO);
}

#[tokio::test]
async fn matching_a_transaction_moves_it_into_the_ledger() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    engine
        .add_schedule(alice, MoneyCents::new(100_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();
    let tx_id = engine
        .record_transaction(NewTransaction {
            user_id: None,
            match_type: MatchType::Unmatched,
            match_confidence: None,
            ..rent(alice, 100_00, date(2024, 1, 3))
        })
        .await
        .unwrap();

    let before = engine
        .flatmate_balance(alice, date(2024, 1, 7))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.total_paid, MoneyCents::ZERO);

    let matched = engine
        .match_transaction(tx_id, Some(alice), MatchType::RentPayment, Some(0.8))
        .await
        .unwrap();
    assert_eq!(matched.user_id, Some(alice));

    let after = engine
        .flatmate_balance(alice, date(2024, 1, 7))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.balance, MoneyCents::ZERO);
    assert_eq!(after.weekly_breakdown[0].transactions, vec![tx_id]);
}

#[tokio::test]
async fn rent_match_requires_a_flatmate() {
    let engine = engine_from("2024-01-01").await;
    let tx_id = engine
        .record_transaction(expense(-10_00, date(2024, 1, 3), "Bills"))
        .await
        .unwrap();

    let err = engine
        .match_transaction(tx_id, None, MatchType::RentPayment, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMatch(_)));

    let err = engine
        .match_transaction(Uuid::new_v4(), None, MatchType::Expense, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn unassigned_rent_payment_is_rejected_on_record() {
    let engine = engine_from("2024-01-01").await;

    let err = engine
        .record_transaction(NewTransaction {
            user_id: None,
            ..rent(Uuid::new_v4(), 100_00, date(2024, 1, 4))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMatch(_)));

    let stored = engine
        .transactions(&TransactionFilter::default())
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn oversized_amounts_are_rejected_and_balances_stay_computable() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();

    let err = engine
        .record_transaction(rent(alice, i64::MAX / 2 + 1, date(2024, 1, 4)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .add_schedule(alice, MoneyCents::new(i64::MAX), date(2024, 1, 1), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    for day in [4, 5] {
        engine
            .record_transaction(rent(alice, MoneyCents::MAX.cents(), date(2024, 1, day)))
            .await
            .unwrap();
    }
    let balance = engine
        .flatmate_balance(alice, date(2024, 1, 14))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.total_paid.cents(), 2 * MoneyCents::MAX.cents());
}

#[tokio::test]
async fn inverted_filter_range_is_reported_as_such() {
    let engine = engine_from("2024-01-01").await;
    let err = engine
        .transactions(&TransactionFilter {
            from: Some(date(2024, 2, 1)),
            to: Some(date(2024, 1, 1)),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange(_)));
}

#[tokio::test]
async fn store_validation_errors() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();

    let err = engine
        .create_user("  alice ", None, UserRole::Member)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let err = engine
        .add_schedule(Uuid::new_v4(), MoneyCents::new(1), date(2024, 1, 1), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .add_schedule(
            alice,
            MoneyCents::new(1),
            date(2024, 2, 1),
            Some(date(2024, 1, 1)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSchedule(_)));

    let err = engine
        .record_transaction(rent(Uuid::new_v4(), 100_00, date(2024, 1, 3)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn ending_a_schedule_stops_the_charges() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    let schedule = engine
        .add_schedule(alice, MoneyCents::new(100_00), date(2024, 1, 1), None, None)
        .await
        .unwrap();
    engine.end_schedule(schedule, date(2024, 1, 14)).await.unwrap();

    let schedules = engine.schedules_for(alice).await.unwrap();
    assert_eq!(schedules[0].end_date, Some(date(2024, 1, 14)));

    let balance = engine
        .flatmate_balance(alice, date(2024, 1, 31))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.total_due, MoneyCents::new(200_00));

    let err = engine
        .end_schedule(schedule, date(2023, 12, 31))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSchedule(_)));
}

#[tokio::test]
async fn transactions_filter_by_range_user_and_type() {
    let engine = engine_from("2024-01-01").await;
    let alice = engine
        .create_user("Alice", None, UserRole::Member)
        .await
        .unwrap();
    engine
        .record_transaction(rent(alice, 100_00, date(2024, 1, 4)))
        .await
        .unwrap();
    engine
        .record_transaction(rent(alice, 100_00, date(2024, 1, 11)))
        .await
        .unwrap();
    engine
        .record_transaction(expense(-30_00, date(2024, 1, 11), "Food"))
        .await
        .unwrap();

    let in_range = engine
        .transactions(&TransactionFilter {
            from: Some(date(2024, 1, 5)),
            to: Some(date(2024, 1, 11)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_range.len(), 2);

    let rent_only = engine
        .transactions(&TransactionFilter {
            user_id: Some(alice),
            match_type: Some(MatchType::RentPayment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rent_only.len(), 2);
    assert!(rent_only[0].date <= rent_only[1].date);
}

#[tokio::test]
async fn spending_report_over_analysis_window() {
    let engine = engine_from("2024-03-01").await;
    engine
        .record_transaction(expense(-60_00, date(2024, 3, 2), "Groceries"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(-10_00, date(2024, 3, 3), "groceries"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(-70_00, date(2024, 3, 9), "Internet"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(-999_00, date(2024, 2, 20), "Furniture"))
        .await
        .unwrap();

    let report = engine.spending_report(date(2024, 3, 14)).await.unwrap();

    assert_eq!(report.total_spent, MoneyCents::new(140_00));
    assert_eq!(report.weekly_burn_rate, MoneyCents::new(70_00));
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].total, MoneyCents::new(70_00));
}
