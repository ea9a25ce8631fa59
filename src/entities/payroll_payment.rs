use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "payroll_payments")]
#[schema(as = PayrollPayment)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Pay period as `YYYY-MM`
    pub month: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub days_worked: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub daily_wage: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub gross_amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
