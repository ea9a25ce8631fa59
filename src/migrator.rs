use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_inventory_tables::Migration),
            Box::new(m20260101_000002_create_purchase_and_usage_tables::Migration),
            Box::new(m20260101_000003_create_order_tables::Migration),
            Box::new(m20260101_000004_create_ledger_documents_table::Migration),
            Box::new(m20260101_000005_create_payroll_tables::Migration),
            Box::new(m20260101_000006_create_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20260101_000001_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // matches entities/inventory_item.rs
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(InventoryItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(InventoryItems::Category).string_len(20).not_null())
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Unit).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::TotalInStock)
                                .decimal_len(16, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderThreshold)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryItems::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(InventoryItems::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::LastUpdated)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // name lookups are per category
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("ux_inventory_items_category_name")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .col(InventoryItems::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(StockMovements::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(StockMovements::ItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(StockMovements::Delta)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Kind).string_len(20).not_null())
                        .col(ColumnDef::new(StockMovements::ReferenceType).string().null())
                        .col(ColumnDef::new(StockMovements::ReferenceId).uuid().null())
                        .col(
                            ColumnDef::new(StockMovements::BalanceAfter)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Note).string().null())
                        .col(
                            ColumnDef::new(StockMovements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_movements_item")
                                .from(StockMovements::Table, StockMovements::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_item_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InventoryItems {
        Table,
        Id,
        Category,
        Name,
        Unit,
        TotalInStock,
        ReorderThreshold,
        ExpiryDate,
        Version,
        CreatedAt,
        LastUpdated,
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        ItemId,
        Delta,
        Kind,
        ReferenceType,
        ReferenceId,
        BalanceAfter,
        Note,
        CreatedAt,
    }
}

mod m20260101_000002_create_purchase_and_usage_tables {
    use super::m20260101_000001_create_inventory_tables::InventoryItems;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_purchase_and_usage_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseRecords::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PurchaseRecords::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(PurchaseRecords::ItemId).uuid().not_null())
                        .col(ColumnDef::new(PurchaseRecords::Vendor).string().not_null())
                        .col(ColumnDef::new(PurchaseRecords::Category).string_len(20).not_null())
                        .col(ColumnDef::new(PurchaseRecords::ItemName).string().not_null())
                        .col(ColumnDef::new(PurchaseRecords::Unit).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseRecords::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRecords::UnitPrice)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRecords::TotalCost)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseRecords::PurchaseDate).date().not_null())
                        .col(ColumnDef::new(PurchaseRecords::ExpiryDate).date().null())
                        .col(ColumnDef::new(PurchaseRecords::Notes).text().null())
                        .col(
                            ColumnDef::new(PurchaseRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_records_item")
                                .from(PurchaseRecords::Table, PurchaseRecords::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_records_purchase_date")
                        .table(PurchaseRecords::Table)
                        .col(PurchaseRecords::PurchaseDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UsageRecords::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(UsageRecords::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(UsageRecords::ItemId).uuid().not_null())
                        .col(ColumnDef::new(UsageRecords::Category).string_len(20).not_null())
                        .col(ColumnDef::new(UsageRecords::ItemName).string().not_null())
                        .col(ColumnDef::new(UsageRecords::Unit).string().not_null())
                        .col(
                            ColumnDef::new(UsageRecords::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(UsageRecords::UsageDate).date().not_null())
                        .col(ColumnDef::new(UsageRecords::Notes).text().null())
                        .col(
                            ColumnDef::new(UsageRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_usage_records_item")
                                .from(UsageRecords::Table, UsageRecords::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UsageRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseRecords {
        Table,
        Id,
        ItemId,
        Vendor,
        Category,
        ItemName,
        Unit,
        Quantity,
        UnitPrice,
        TotalCost,
        PurchaseDate,
        ExpiryDate,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum UsageRecords {
        Table,
        Id,
        ItemId,
        Category,
        ItemName,
        Unit,
        Quantity,
        UsageDate,
        Notes,
        CreatedAt,
    }
}

mod m20260101_000003_create_order_tables {
    use super::m20260101_000001_create_inventory_tables::InventoryItems;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerPhone).string().null())
                        .col(ColumnDef::new(Orders::CustomerAddress).string().null())
                        .col(ColumnDef::new(Orders::ItemId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Breed).string().not_null())
                        .col(ColumnDef::new(Orders::Quantity).integer().not_null())
                        .col(ColumnDef::new(Orders::UnitPrice).decimal_len(16, 4).not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                        .col(
                            ColumnDef::new(Orders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_item")
                                .from(Orders::Table, Orders::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderStatusChanges::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderStatusChanges::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderStatusChanges::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderStatusChanges::FromStatus).string_len(20).null())
                        .col(
                            ColumnDef::new(OrderStatusChanges::ToStatus)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderStatusChanges::Note).string().null())
                        .col(
                            ColumnDef::new(OrderStatusChanges::ChangedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_status_changes_order")
                                .from(OrderStatusChanges::Table, OrderStatusChanges::OrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_status_changes_order_id")
                        .table(OrderStatusChanges::Table)
                        .col(OrderStatusChanges::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ChickenPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ChickenPrices::Breed)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ChickenPrices::PricePerUnit)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ChickenPrices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ChickenPrices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderStatusChanges::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        OrderNumber,
        CustomerName,
        CustomerPhone,
        CustomerAddress,
        ItemId,
        Breed,
        Quantity,
        UnitPrice,
        TotalAmount,
        Status,
        OrderDate,
        Version,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum OrderStatusChanges {
        Table,
        Id,
        OrderId,
        FromStatus,
        ToStatus,
        Note,
        ChangedAt,
    }

    #[derive(DeriveIden)]
    enum ChickenPrices {
        Table,
        Breed,
        PricePerUnit,
        UpdatedAt,
    }
}

mod m20260101_000004_create_ledger_documents_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_ledger_documents_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LedgerDocuments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(LedgerDocuments::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(LedgerDocuments::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(LedgerDocuments::Kind).string_len(20).not_null())
                        .col(ColumnDef::new(LedgerDocuments::Status).string_len(20).not_null())
                        .col(ColumnDef::new(LedgerDocuments::SourceType).string_len(20).not_null())
                        .col(ColumnDef::new(LedgerDocuments::SourceId).uuid().not_null())
                        .col(ColumnDef::new(LedgerDocuments::Counterparty).string().not_null())
                        .col(ColumnDef::new(LedgerDocuments::Description).string().not_null())
                        .col(
                            ColumnDef::new(LedgerDocuments::Amount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerDocuments::Currency).string_len(3).not_null())
                        .col(
                            ColumnDef::new(LedgerDocuments::IssuedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerDocuments::VoidedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // one companion document per source transaction
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("ux_ledger_documents_source")
                        .table(LedgerDocuments::Table)
                        .col(LedgerDocuments::Kind)
                        .col(LedgerDocuments::SourceType)
                        .col(LedgerDocuments::SourceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LedgerDocuments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LedgerDocuments {
        Table,
        Id,
        Number,
        Kind,
        Status,
        SourceType,
        SourceId,
        Counterparty,
        Description,
        Amount,
        Currency,
        IssuedAt,
        VoidedAt,
    }
}

mod m20260101_000005_create_payroll_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000005_create_payroll_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Employees::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Employees::Name).string().not_null())
                        .col(ColumnDef::new(Employees::Phone).string().null())
                        .col(ColumnDef::new(Employees::Role).string().not_null())
                        .col(ColumnDef::new(Employees::DailyWage).decimal_len(16, 4).not_null())
                        .col(ColumnDef::new(Employees::JoinedOn).date().not_null())
                        .col(
                            ColumnDef::new(Employees::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Employees::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Employees::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AttendanceRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AttendanceRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AttendanceRecords::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(AttendanceRecords::Date).date().not_null())
                        .col(ColumnDef::new(AttendanceRecords::Status).string_len(20).not_null())
                        .col(
                            ColumnDef::new(AttendanceRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AttendanceRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_attendance_records_employee")
                                .from(AttendanceRecords::Table, AttendanceRecords::EmployeeId)
                                .to(Employees::Table, Employees::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("ux_attendance_records_employee_date")
                        .table(AttendanceRecords::Table)
                        .col(AttendanceRecords::EmployeeId)
                        .col(AttendanceRecords::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PayrollPayments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayrollPayments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollPayments::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(PayrollPayments::Month).string_len(7).not_null())
                        .col(
                            ColumnDef::new(PayrollPayments::DaysWorked)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPayments::DailyWage)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPayments::GrossAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPayments::PaidAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payroll_payments_employee")
                                .from(PayrollPayments::Table, PayrollPayments::EmployeeId)
                                .to(Employees::Table, Employees::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("ux_payroll_payments_employee_month")
                        .table(PayrollPayments::Table)
                        .col(PayrollPayments::EmployeeId)
                        .col(PayrollPayments::Month)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PayrollPayments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        Id,
        Name,
        Phone,
        Role,
        DailyWage,
        JoinedOn,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum AttendanceRecords {
        Table,
        Id,
        EmployeeId,
        Date,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PayrollPayments {
        Table,
        Id,
        EmployeeId,
        Month,
        DaysWorked,
        DailyWage,
        GrossAmount,
        PaidAt,
    }
}

mod m20260101_000006_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000006_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        CreatedAt,
    }
}
