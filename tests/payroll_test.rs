mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::TestApp;
use henhouse_api::{
    entities::{AttendanceStatus, DocumentKind, SourceType},
    errors::ServiceError,
    services::payroll::{AttendanceMark, NewEmployee},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

async fn hire(app: &TestApp) -> Uuid {
    app.services()
        .payroll
        .create_employee(NewEmployee {
            name: "Ravi Kumar".to_string(),
            phone: None,
            role: "shed hand".to_string(),
            daily_wage: dec!(450),
            joined_on: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        })
        .await
        .unwrap()
        .id
}

async fn mark(app: &TestApp, employee_id: Uuid, date: NaiveDate, status: AttendanceStatus) {
    app.services()
        .payroll
        .mark_attendance(employee_id, AttendanceMark { date, status })
        .await
        .unwrap();
}

#[tokio::test]
async fn marking_a_day_twice_keeps_the_last_mark() {
    let app = TestApp::new().await;
    let employee_id = hire(&app).await;

    mark(&app, employee_id, day(1), AttendanceStatus::Absent).await;
    mark(&app, employee_id, day(1), AttendanceStatus::Present).await;

    let marks = app
        .services()
        .payroll
        .attendance(employee_id, "2026-09")
        .await
        .unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].status, AttendanceStatus::Present);
}

#[tokio::test]
async fn attendance_before_joining_is_rejected() {
    let app = TestApp::new().await;
    let employee_id = hire(&app).await;

    let early = app
        .services()
        .payroll
        .mark_attendance(
            employee_id,
            AttendanceMark {
                date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                status: AttendanceStatus::Present,
            },
        )
        .await;
    assert_matches!(early, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn compute_counts_half_days_and_ignores_other_months() {
    let app = TestApp::new().await;
    let employee_id = hire(&app).await;

    for d in 1..=10 {
        mark(&app, employee_id, day(d), AttendanceStatus::Present).await;
    }
    mark(&app, employee_id, day(11), AttendanceStatus::HalfDay).await;
    mark(&app, employee_id, day(12), AttendanceStatus::Absent).await;
    mark(&app, employee_id, day(13), AttendanceStatus::Leave).await;
    mark(
        &app,
        employee_id,
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        AttendanceStatus::Present,
    )
    .await;

    let summary = app
        .services()
        .payroll
        .compute(employee_id, "2026-09")
        .await
        .unwrap();
    assert_eq!(summary.present_days, 10);
    assert_eq!(summary.half_days, 1);
    assert_eq!(summary.absent_days, 1);
    assert_eq!(summary.leave_days, 1);
    assert_eq!(summary.days_worked, dec!(10.5));
    assert_eq!(summary.gross_amount, dec!(4725));
    assert!(!summary.paid);

    let bad_month = app.services().payroll.compute(employee_id, "2026-9").await;
    assert_matches!(bad_month, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn paying_books_an_expense_once() {
    let app = TestApp::new().await;
    let employee_id = hire(&app).await;
    for d in 1..=4 {
        mark(&app, employee_id, day(d), AttendanceStatus::Present).await;
    }

    let outcome = app
        .services()
        .payroll
        .pay(employee_id, "2026-09")
        .await
        .unwrap();
    assert_eq!(outcome.payment.month, "2026-09");
    assert_eq!(outcome.payment.gross_amount, dec!(1800));
    assert_eq!(outcome.expense.kind, DocumentKind::Expense);
    assert_eq!(outcome.expense.source_type, SourceType::Payroll);
    assert_eq!(outcome.expense.source_id, outcome.payment.id);
    assert_eq!(outcome.expense.amount, dec!(1800));
    assert_eq!(outcome.expense.counterparty, "Ravi Kumar");

    let summary = app
        .services()
        .payroll
        .compute(employee_id, "2026-09")
        .await
        .unwrap();
    assert!(summary.paid);

    let twice = app.services().payroll.pay(employee_id, "2026-09").await;
    assert_matches!(twice, Err(ServiceError::Conflict(_)));

    let report = app.services().invoicing.reconcile().await.unwrap();
    assert!(report.balanced, "{:?}", report);
    assert_eq!(report.checked_sources, 1);
}

#[tokio::test]
async fn nothing_to_pay_or_nobody_to_pay() {
    let app = TestApp::new().await;
    let employee_id = hire(&app).await;

    mark(&app, employee_id, day(2), AttendanceStatus::Absent).await;
    let nothing = app.services().payroll.pay(employee_id, "2026-09").await;
    assert_matches!(nothing, Err(ServiceError::InvalidOperation(_)));

    mark(&app, employee_id, day(3), AttendanceStatus::Present).await;
    let employee = app
        .services()
        .payroll
        .deactivate_employee(employee_id)
        .await
        .unwrap();
    assert!(!employee.active);

    let inactive = app.services().payroll.pay(employee_id, "2026-09").await;
    assert_matches!(inactive, Err(ServiceError::InvalidOperation(_)));
    let late_mark = app
        .services()
        .payroll
        .mark_attendance(
            employee_id,
            AttendanceMark {
                date: day(4),
                status: AttendanceStatus::Present,
            },
        )
        .await;
    assert_matches!(late_mark, Err(ServiceError::InvalidOperation(_)));

    let active = app
        .services()
        .payroll
        .list_employees(Some(true))
        .await
        .unwrap();
    assert!(active.is_empty());

    let unknown = app.services().payroll.pay(Uuid::new_v4(), "2026-09").await;
    assert_matches!(unknown, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn wages_beyond_the_ledger_are_refused() {
    let app = TestApp::new().await;
    let payroll = &app.services().payroll;

    let too_rich = payroll
        .create_employee(NewEmployee {
            name: "Anil".to_string(),
            phone: None,
            role: "manager".to_string(),
            daily_wage: dec!(1000000000000),
            joined_on: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        })
        .await;
    assert_matches!(too_rich, Err(ServiceError::ValidationError(_)));

    let employee_id = payroll
        .create_employee(NewEmployee {
            name: "Anil".to_string(),
            phone: None,
            role: "manager".to_string(),
            daily_wage: dec!(999999999999),
            joined_on: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        })
        .await
        .unwrap()
        .id;
    mark(&app, employee_id, day(1), AttendanceStatus::Present).await;
    mark(&app, employee_id, day(2), AttendanceStatus::Present).await;

    let summary = payroll.compute(employee_id, "2026-09").await;
    assert_matches!(summary, Err(ServiceError::ValidationError(_)));
    let paid = payroll.pay(employee_id, "2026-09").await;
    assert_matches!(paid, Err(ServiceError::ValidationError(_)));

    let (_, documents) = app
        .services()
        .invoicing
        .list(Default::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(documents, 0);
}
