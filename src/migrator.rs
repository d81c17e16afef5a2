use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_clients_table::Migration),
            Box::new(m20240301_000002_create_suppliers_tables::Migration),
            Box::new(m20240301_000003_create_contact_tables::Migration),
            Box::new(m20240301_000004_create_parts_and_labor_tables::Migration),
            Box::new(m20240301_000005_create_planning_events_table::Migration),
            Box::new(m20240301_000006_create_invoices_tables::Migration),
            Box::new(m20240301_000007_create_revenue_targets_table::Migration),
        ]
    }
}

mod m20240301_000001_create_clients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Clients::LastName).string().not_null())
                        .col(ColumnDef::new(Clients::FirstName).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::PostalCode).string().null())
                        .col(ColumnDef::new(Clients::City).string().null())
                        .col(ColumnDef::new(Clients::Country).string().null())
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Clients::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_last_name")
                        .table(Clients::Table)
                        .col(Clients::LastName)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        LastName,
        FirstName,
        Phone,
        Email,
        Address,
        PostalCode,
        City,
        Country,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_suppliers_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_suppliers_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(
                            ColumnDef::new(Suppliers::AverageDeliveryDays)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierDiscounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierDiscounts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SupplierDiscounts::SupplierId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierDiscounts::PartCategory)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierDiscounts::DiscountPercent)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierDiscounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierDiscounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_discounts_supplier_id")
                                .from(SupplierDiscounts::Table, SupplierDiscounts::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supplier_discounts_supplier_id")
                        .table(SupplierDiscounts::Table)
                        .col(SupplierDiscounts::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierDiscounts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        Name,
        ContactPerson,
        Phone,
        Email,
        Address,
        AverageDeliveryDays,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SupplierDiscounts {
        Table,
        Id,
        SupplierId,
        PartCategory,
        DiscountPercent,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000003_create_contact_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_contact_tables"
        }
    }

    /// Insurers and experts share one column layout.
    fn organisation_table(table: Contact, delay_column: Contact) -> TableCreateStatement {
        Table::create()
            .table(table)
            .if_not_exists()
            .col(
                ColumnDef::new(Contact::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Contact::Name).string().not_null())
            .col(ColumnDef::new(Contact::ContactPerson).string().null())
            .col(ColumnDef::new(Contact::Phone).string().null())
            .col(ColumnDef::new(Contact::Email).string().null())
            .col(ColumnDef::new(Contact::Address).string().null())
            .col(ColumnDef::new(delay_column).integer().null())
            .col(
                ColumnDef::new(Contact::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Contact::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(organisation_table(
                    Contact::Insurers,
                    Contact::AveragePaymentDays,
                ))
                .await?;

            manager
                .create_table(organisation_table(
                    Contact::Experts,
                    Contact::AverageResponseDays,
                ))
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Technicians::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Technicians::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Technicians::LastName).string().not_null())
                        .col(ColumnDef::new(Technicians::FirstName).string().not_null())
                        .col(ColumnDef::new(Technicians::Address).string().not_null())
                        .col(ColumnDef::new(Technicians::PostalCode).string().not_null())
                        .col(ColumnDef::new(Technicians::City).string().not_null())
                        .col(ColumnDef::new(Technicians::BirthDate).date().not_null())
                        .col(ColumnDef::new(Technicians::Email).string().not_null())
                        .col(ColumnDef::new(Technicians::Phone).string().not_null())
                        .col(
                            ColumnDef::new(Technicians::TechnicianNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Technicians::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Technicians::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Technicians::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Contact::Experts).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Contact::Insurers).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Contact {
        Insurers,
        Experts,
        Id,
        Name,
        ContactPerson,
        Phone,
        Email,
        Address,
        AveragePaymentDays,
        AverageResponseDays,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Technicians {
        Table,
        Id,
        LastName,
        FirstName,
        Address,
        PostalCode,
        City,
        BirthDate,
        Email,
        Phone,
        TechnicianNumber,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000004_create_parts_and_labor_tables {

    use super::m20240301_000002_create_suppliers_tables::Suppliers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_parts_and_labor_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Parts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Parts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Parts::Designation).string().not_null())
                        .col(ColumnDef::new(Parts::Reference).string().null())
                        .col(ColumnDef::new(Parts::PurchasePrice).decimal_len(12, 2).null())
                        .col(ColumnDef::new(Parts::SalePrice).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Parts::Category).string().null())
                        .col(ColumnDef::new(Parts::SupplierId).integer().null())
                        .col(
                            ColumnDef::new(Parts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Parts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parts_supplier_id")
                                .from(Parts::Table, Parts::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_supplier_id")
                        .table(Parts::Table)
                        .col(Parts::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(LaborRates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LaborRates::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(LaborRates::Description).string().not_null())
                        .col(
                            ColumnDef::new(LaborRates::HourlyRate)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LaborRates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LaborRates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LaborRates::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Parts {
        Table,
        Id,
        Designation,
        Reference,
        PurchasePrice,
        SalePrice,
        Category,
        SupplierId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum LaborRates {
        Table,
        Id,
        Description,
        HourlyRate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000005_create_planning_events_table {

    use super::m20240301_000001_create_clients_table::Clients;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_planning_events_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PlanningEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PlanningEvents::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PlanningEvents::ClientId).integer().not_null())
                        .col(
                            ColumnDef::new(PlanningEvents::StartAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::EndAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::WorkDescription)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::TechnicianName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::CarRegistration)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanningEvents::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_planning_events_client_id")
                                .from(PlanningEvents::Table, PlanningEvents::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_planning_events_start_at")
                        .table(PlanningEvents::Table)
                        .col(PlanningEvents::StartAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PlanningEvents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PlanningEvents {
        Table,
        Id,
        ClientId,
        StartAt,
        EndAt,
        WorkDescription,
        TechnicianName,
        CarRegistration,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000006_create_invoices_tables {

    use super::m20240301_000001_create_clients_table::Clients;
    use super::m20240301_000004_create_parts_and_labor_tables::{LaborRates, Parts};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000006_create_invoices_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::ClientId).integer().not_null())
                        .col(
                            ColumnDef::new(Invoices::IssuedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::Notes).text().null())
                        .col(
                            ColumnDef::new(Invoices::TotalHt)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TotalTtc)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_client_id")
                                .from(Invoices::Table, Invoices::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_issued_at")
                        .table(Invoices::Table)
                        .col(Invoices::IssuedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InvoiceLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceLines::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(InvoiceLines::InvoiceId).integer().not_null())
                        .col(ColumnDef::new(InvoiceLines::Description).string().not_null())
                        .col(
                            ColumnDef::new(InvoiceLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::UnitPriceHt)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::LineTotalHt)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceLines::PartId).integer().null())
                        .col(ColumnDef::new(InvoiceLines::LaborRateId).integer().null())
                        .col(
                            ColumnDef::new(InvoiceLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_lines_invoice_id")
                                .from(InvoiceLines::Table, InvoiceLines::InvoiceId)
                                .to(Invoices::Table, Invoices::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_lines_part_id")
                                .from(InvoiceLines::Table, InvoiceLines::PartId)
                                .to(Parts::Table, Parts::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_lines_labor_rate_id")
                                .from(InvoiceLines::Table, InvoiceLines::LaborRateId)
                                .to(LaborRates::Table, LaborRates::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_lines_invoice_id")
                        .table(InvoiceLines::Table)
                        .col(InvoiceLines::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        ClientId,
        IssuedAt,
        Notes,
        TotalHt,
        TotalTtc,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InvoiceLines {
        Table,
        Id,
        InvoiceId,
        Description,
        Quantity,
        UnitPriceHt,
        LineTotalHt,
        PartId,
        LaborRateId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000007_create_revenue_targets_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000007_create_revenue_targets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RevenueTargets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RevenueTargets::TargetDate)
                                .date()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(RevenueTargets::Amount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RevenueTargets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RevenueTargets {
        Table,
        TargetDate,
        Amount,
    }
}
