use crate::{
    entities::{
        attendance::{self, AttendanceStatus, Entity as AttendanceEntity},
        employee::{self, Entity as EmployeeEntity},
        ledger_document::{self, DocumentKind, SourceType},
        payroll_payment::{self, Entity as PayrollPaymentEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        amounts::{line_total, non_negative_amount},
        invoicing::{emit_document, LedgerDocumentDraft},
    },
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A pay period written as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayMonth {
    first_day: NaiveDate,
}

impl PayMonth {
    pub fn parse(month: &str) -> Result<Self, ServiceError> {
        let invalid =
            || ServiceError::ValidationError(format!("month must be YYYY-MM, got '{}'", month));
        if month.len() != 7 || month.as_bytes().get(4) != Some(&b'-') {
            return Err(invalid());
        }
        let first_day =
            NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(Self { first_day })
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(self) -> NaiveDate {
        let (year, month) = if self.first_day.month() == 12 {
            (self.first_day.year() + 1, 1)
        } else {
            (self.first_day.year(), self.first_day.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|next| next - Duration::days(1))
            .unwrap_or(self.first_day)
    }

    pub fn label(self) -> String {
        self.first_day.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: String,
    pub daily_wage: Decimal,
    pub joined_on: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceMark {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Attendance tally and wage for one employee and month
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollSummary {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub month: String,
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub days_worked: Decimal,
    pub daily_wage: Decimal,
    pub gross_amount: Decimal,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollOutcome {
    pub payment: payroll_payment::Model,
    pub expense: ledger_document::Model,
}

/// `days_worked = present + 0.5 * half_day`; absences and leave are unpaid
pub fn summarize(
    employee: &employee::Model,
    month: PayMonth,
    marks: &[attendance::Model],
    paid: bool,
) -> Result<PayrollSummary, ServiceError> {
    let count =
        |status: AttendanceStatus| marks.iter().filter(|m| m.status == status).count() as u32;
    let days_worked: Decimal = marks.iter().map(|m| m.status.paid_fraction()).sum();

    Ok(PayrollSummary {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        month: month.label(),
        present_days: count(AttendanceStatus::Present),
        half_days: count(AttendanceStatus::HalfDay),
        absent_days: count(AttendanceStatus::Absent),
        leave_days: count(AttendanceStatus::Leave),
        days_worked,
        daily_wage: employee.daily_wage,
        gross_amount: line_total(employee.daily_wage, days_worked)?,
        paid,
    })
}

async fn find_employee<C>(conn: &C, id: Uuid) -> Result<employee::Model, ServiceError>
where
    C: ConnectionTrait,
{
    EmployeeEntity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))
}

async fn marks_for_month<C>(
    conn: &C,
    employee_id: Uuid,
    month: PayMonth,
) -> Result<Vec<attendance::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    AttendanceEntity::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Date.gte(month.first_day()))
        .filter(attendance::Column::Date.lte(month.last_day()))
        .order_by_asc(attendance::Column::Date)
        .all(conn)
        .await
        .map_err(ServiceError::db_error)
}

async fn find_payment<C>(
    conn: &C,
    employee_id: Uuid,
    month: PayMonth,
) -> Result<Option<payroll_payment::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    PayrollPaymentEntity::find()
        .filter(payroll_payment::Column::EmployeeId.eq(employee_id))
        .filter(payroll_payment::Column::Month.eq(month.label()))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Staff, their daily attendance and monthly wages
#[derive(Clone)]
pub struct PayrollService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    currency: String,
}

impl PayrollService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, currency: String) -> Self {
        Self {
            db,
            event_sender,
            currency,
        }
    }

    #[instrument(skip(self, new_employee), fields(name = %new_employee.name))]
    pub async fn create_employee(
        &self,
        new_employee: NewEmployee,
    ) -> Result<employee::Model, ServiceError> {
        new_employee.validate()?;
        non_negative_amount("daily_wage", new_employee.daily_wage)?;

        let now = Utc::now();
        let employee = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_employee.name.trim().to_string()),
            phone: Set(new_employee.phone),
            role: Set(new_employee.role.trim().to_string()),
            daily_wage: Set(new_employee.daily_wage),
            joined_on: Set(new_employee.joined_on),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(employee_id = %employee.id, "Employee added");
        Ok(employee)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<employee::Model, ServiceError> {
        find_employee(&*self.db, id).await
    }

    pub async fn list_employees(
        &self,
        active: Option<bool>,
    ) -> Result<Vec<employee::Model>, ServiceError> {
        let mut query = EmployeeEntity::find().order_by_asc(employee::Column::Name);
        if let Some(active) = active {
            query = query.filter(employee::Column::Active.eq(active));
        }
        query.all(&*self.db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_employee(&self, id: Uuid) -> Result<employee::Model, ServiceError> {
        let employee = find_employee(&*self.db, id).await?;
        if !employee.active {
            return Ok(employee);
        }
        let mut active: employee::ActiveModel = employee.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    /// Records the day's attendance, replacing any earlier mark for that day
    #[instrument(skip(self))]
    pub async fn mark_attendance(
        &self,
        employee_id: Uuid,
        mark: AttendanceMark,
    ) -> Result<attendance::Model, ServiceError> {
        let employee = find_employee(&*self.db, employee_id).await?;
        if !employee.active {
            return Err(ServiceError::InvalidOperation(format!(
                "{} is no longer active",
                employee.name
            )));
        }
        if mark.date < employee.joined_on {
            return Err(ServiceError::ValidationError(format!(
                "{} joined on {}",
                employee.name, employee.joined_on
            )));
        }

        let now = Utc::now();
        let record = attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            date: Set(mark.date),
            status: Set(mark.status),
            created_at: Set(now),
            updated_at: Set(now),
        };
        AttendanceEntity::insert(record)
            .on_conflict(
                OnConflict::columns([attendance::Column::EmployeeId, attendance::Column::Date])
                    .update_columns([attendance::Column::Status, attendance::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        AttendanceEntity::find()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .filter(attendance::Column::Date.eq(mark.date))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::InternalError("attendance mark not stored".to_string()))
    }

    pub async fn attendance(
        &self,
        employee_id: Uuid,
        month: &str,
    ) -> Result<Vec<attendance::Model>, ServiceError> {
        let month = PayMonth::parse(month)?;
        find_employee(&*self.db, employee_id).await?;
        marks_for_month(&*self.db, employee_id, month).await
    }

    #[instrument(skip(self))]
    pub async fn compute(
        &self,
        employee_id: Uuid,
        month: &str,
    ) -> Result<PayrollSummary, ServiceError> {
        let month = PayMonth::parse(month)?;
        let employee = find_employee(&*self.db, employee_id).await?;
        let marks = marks_for_month(&*self.db, employee_id, month).await?;
        let paid = find_payment(&*self.db, employee_id, month).await?.is_some();
        summarize(&employee, month, &marks, paid)
    }

    /// Pays one month's wages and books the expense. Each month is paid at most once.
    #[instrument(skip(self))]
    pub async fn pay(
        &self,
        employee_id: Uuid,
        month: &str,
    ) -> Result<PayrollOutcome, ServiceError> {
        let month = PayMonth::parse(month)?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let employee = find_employee(&txn, employee_id).await?;
        if !employee.active {
            return Err(ServiceError::InvalidOperation(format!(
                "{} is no longer active",
                employee.name
            )));
        }
        if find_payment(&txn, employee_id, month).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "{} has already been paid for {}",
                employee.name,
                month.label()
            )));
        }

        let marks = marks_for_month(&txn, employee_id, month).await?;
        let summary = summarize(&employee, month, &marks, false)?;
        if summary.days_worked.is_zero() {
            return Err(ServiceError::InvalidOperation(format!(
                "{} has no days worked in {}",
                employee.name, summary.month
            )));
        }

        let payment = payroll_payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            month: Set(summary.month.clone()),
            days_worked: Set(summary.days_worked),
            daily_wage: Set(summary.daily_wage),
            gross_amount: Set(summary.gross_amount),
            paid_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let expense = emit_document(
            &txn,
            LedgerDocumentDraft {
                kind: DocumentKind::Expense,
                source_type: SourceType::Payroll,
                source_id: payment.id,
                counterparty: employee.name.clone(),
                description: format!(
                    "Wages for {}, {} days",
                    summary.month,
                    summary.days_worked.normalize()
                ),
                amount: payment.gross_amount,
                currency: self.currency.clone(),
            },
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit payroll payment: {}", e);
            ServiceError::db_error(e)
        })?;

        counter!("henhouse_payroll.payments", 1);
        info!(%employee_id, month = %payment.month, amount = %payment.gross_amount, "Wages paid");

        self.event_sender
            .send_or_log(Event::PayrollPaid {
                payment_id: payment.id,
                employee_id,
                month: payment.month.clone(),
                amount: payment.gross_amount,
            })
            .await;
        self.event_sender
            .send_or_log(Event::DocumentIssued {
                document_id: expense.id,
                number: expense.number.clone(),
                kind: expense.kind,
            })
            .await;

        Ok(PayrollOutcome { payment, expense })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("2026-02", "2026-02-01", "2026-02-28")]
    #[case("2028-02", "2028-02-01", "2028-02-29")]
    #[case("2026-12", "2026-12-01", "2026-12-31")]
    fn month_bounds(#[case] month: &str, #[case] first: &str, #[case] last: &str) {
        let month = PayMonth::parse(month).unwrap();
        assert_eq!(month.first_day().to_string(), first);
        assert_eq!(month.last_day().to_string(), last);
    }

    #[rstest]
    #[case("2026-13")]
    #[case("2026-1")]
    #[case("26-01-01")]
    #[case("")]
    fn rejects_malformed_months(#[case] month: &str) {
        assert!(PayMonth::parse(month).is_err());
    }

    #[test]
    fn half_days_count_half() {
        let employee = employee::Model {
            id: Uuid::new_v4(),
            name: "Lakshmi".into(),
            phone: None,
            role: "caretaker".into(),
            daily_wage: dec!(450),
            joined_on: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let month = PayMonth::parse("2026-10").unwrap();
        let marks: Vec<_> = [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::HalfDay,
            AttendanceStatus::Absent,
            AttendanceStatus::Leave,
        ]
        .into_iter()
        .enumerate()
        .map(|(day, status)| attendance::Model {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            date: month.first_day() + Duration::days(day as i64),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .collect();

        let summary = summarize(&employee, month, &marks, false).unwrap();
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(summary.days_worked, dec!(2.5));
        assert_eq!(summary.gross_amount, dec!(1125));
    }
}
