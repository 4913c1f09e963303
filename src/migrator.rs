use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240201_000001_create_locations_table::Migration),
            Box::new(m20240201_000002_create_users_table::Migration),
            Box::new(m20240201_000003_create_inventory_levels_table::Migration),
            Box::new(m20240201_000004_create_collections_table::Migration),
            Box::new(m20240201_000005_create_sales_table::Migration),
            Box::new(m20240201_000006_create_stock_transfers_table::Migration),
            Box::new(m20240201_000007_create_expenses_table::Migration),
            Box::new(m20240201_000008_create_fleet_tables::Migration),
            Box::new(m20240201_000009_create_rate_cards_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240201_000001_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000001_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::LocationType).string().not_null())
                        .col(ColumnDef::new(Locations::District).string().not_null())
                        .col(ColumnDef::new(Locations::Address).string().null())
                        .col(ColumnDef::new(Locations::ContactName).string().null())
                        .col(ColumnDef::new(Locations::ContactPhone).string().null())
                        .col(ColumnDef::new(Locations::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Locations::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_type")
                        .table(Locations::Table)
                        .col(Locations::LocationType)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_district")
                        .table(Locations::Table)
                        .col(Locations::District)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        Name,
        LocationType,
        District,
        Address,
        ContactName,
        ContactPhone,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240201_000002_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000002_create_users_table"
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
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FullName).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
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
        Email,
        PasswordHash,
        FullName,
        Role,
        Active,
        CreatedAt,
    }
}

mod m20240201_000003_create_inventory_levels_table {

    use sea_orm_migration::prelude::*;

    use super::m20240201_000001_create_locations_table::Locations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000003_create_inventory_levels_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryLevels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryLevels::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryLevels::LocationId).uuid().not_null())
                        .col(ColumnDef::new(InventoryLevels::Material).string().not_null())
                        .col(
                            ColumnDef::new(InventoryLevels::Quantity)
                                .decimal_len(19, 3)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryLevels::LastUpdated)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_levels_location")
                                .from(InventoryLevels::Table, InventoryLevels::LocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // One projection row per (location, material) pair.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_inventory_levels_location_material")
                        .table(InventoryLevels::Table)
                        .col(InventoryLevels::LocationId)
                        .col(InventoryLevels::Material)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryLevels::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryLevels {
        Table,
        Id,
        LocationId,
        Material,
        Quantity,
        LastUpdated,
    }
}

mod m20240201_000004_create_collections_table {

    use sea_orm_migration::prelude::*;

    use super::m20240201_000001_create_locations_table::Locations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000004_create_collections_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Collections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Collections::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Collections::LocationId).uuid().not_null())
                        .col(ColumnDef::new(Collections::Material).string().not_null())
                        .col(
                            ColumnDef::new(Collections::Quantity)
                                .decimal_len(19, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Collections::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Collections::AmountPaid)
                                .decimal_len(19, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Collections::Notes).string().null())
                        .col(ColumnDef::new(Collections::CollectedBy).uuid().not_null())
                        .col(ColumnDef::new(Collections::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_collections_location")
                                .from(Collections::Table, Collections::LocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_collections_location_created")
                        .table(Collections::Table)
                        .col(Collections::LocationId)
                        .col(Collections::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Collections::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Collections {
        Table,
        Id,
        LocationId,
        Material,
        Quantity,
        Unit,
        AmountPaid,
        Notes,
        CollectedBy,
        CreatedAt,
    }
}

mod m20240201_000005_create_sales_table {

    use sea_orm_migration::prelude::*;

    use super::m20240201_000001_create_locations_table::Locations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000005_create_sales_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sales::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sales::LocationId).uuid().not_null())
                        .col(ColumnDef::new(Sales::BuyerName).string().not_null())
                        .col(ColumnDef::new(Sales::Material).string().not_null())
                        .col(
                            ColumnDef::new(Sales::Quantity)
                                .decimal_len(19, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Sales::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Sales::SaleAmount)
                                .decimal_len(19, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Sales::PaymentStatus).string().not_null())
                        .col(
                            ColumnDef::new(Sales::AmountDue)
                                .decimal_len(19, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Sales::Notes).string().null())
                        .col(ColumnDef::new(Sales::RecordedBy).uuid().not_null())
                        .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sales_location")
                                .from(Sales::Table, Sales::LocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_location_created")
                        .table(Sales::Table)
                        .col(Sales::LocationId)
                        .col(Sales::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Sales {
        Table,
        Id,
        LocationId,
        BuyerName,
        Material,
        Quantity,
        Unit,
        SaleAmount,
        PaymentStatus,
        AmountDue,
        Notes,
        RecordedBy,
        CreatedAt,
    }
}

mod m20240201_000006_create_stock_transfers_table {

    use sea_orm_migration::prelude::*;

    use super::m20240201_000001_create_locations_table::Locations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000006_create_stock_transfers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockTransfers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockTransfers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::FromLocationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::ToLocationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransfers::Material).string().not_null())
                        .col(
                            ColumnDef::new(StockTransfers::Quantity)
                                .decimal_len(19, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransfers::Notes).string().null())
                        .col(
                            ColumnDef::new(StockTransfers::TransferredBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transfers_from_location")
                                .from(StockTransfers::Table, StockTransfers::FromLocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transfers_to_location")
                                .from(StockTransfers::Table, StockTransfers::ToLocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockTransfers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockTransfers {
        Table,
        Id,
        FromLocationId,
        ToLocationId,
        Material,
        Quantity,
        Notes,
        TransferredBy,
        CreatedAt,
    }
}

mod m20240201_000007_create_expenses_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000007_create_expenses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Expenses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Expenses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Expenses::Category).string().not_null())
                        .col(
                            ColumnDef::new(Expenses::Amount)
                                .decimal_len(19, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Expenses::Description).string().null())
                        .col(ColumnDef::new(Expenses::LocationId).uuid().null())
                        .col(ColumnDef::new(Expenses::IncurredOn).date().not_null())
                        .col(ColumnDef::new(Expenses::RecordedBy).uuid().not_null())
                        .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_expenses_incurred_on")
                        .table(Expenses::Table)
                        .col(Expenses::IncurredOn)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Expenses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Expenses {
        Table,
        Id,
        Category,
        Amount,
        Description,
        LocationId,
        IncurredOn,
        RecordedBy,
        CreatedAt,
    }
}

mod m20240201_000008_create_fleet_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000008_create_fleet_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vehicles::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Vehicles::RegistrationNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Vehicles::VehicleType).string().not_null())
                        .col(
                            ColumnDef::new(Vehicles::CapacityKg)
                                .decimal_len(19, 3)
                                .null(),
                        )
                        .col(ColumnDef::new(Vehicles::Status).string().not_null())
                        .col(ColumnDef::new(Vehicles::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Vehicles::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Drivers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Drivers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Drivers::Name).string().not_null())
                        .col(ColumnDef::new(Drivers::Phone).string().null())
                        .col(
                            ColumnDef::new(Drivers::LicenseNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Drivers::Status).string().not_null())
                        .col(ColumnDef::new(Drivers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Drivers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Trips::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Trips::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Trips::VehicleId).uuid().not_null())
                        .col(ColumnDef::new(Trips::DriverId).uuid().not_null())
                        .col(ColumnDef::new(Trips::FromLocationId).uuid().null())
                        .col(ColumnDef::new(Trips::ToLocationId).uuid().null())
                        .col(ColumnDef::new(Trips::TripDate).date().not_null())
                        .col(ColumnDef::new(Trips::DistanceKm).decimal_len(10, 2).null())
                        .col(ColumnDef::new(Trips::Status).string().not_null())
                        .col(ColumnDef::new(Trips::Notes).string().null())
                        .col(ColumnDef::new(Trips::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Trips::UpdatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_vehicle")
                                .from(Trips::Table, Trips::VehicleId)
                                .to(Vehicles::Table, Vehicles::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_driver")
                                .from(Trips::Table, Trips::DriverId)
                                .to(Drivers::Table, Drivers::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Trips::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Drivers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Vehicles {
        Table,
        Id,
        RegistrationNo,
        VehicleType,
        CapacityKg,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Drivers {
        Table,
        Id,
        Name,
        Phone,
        LicenseNo,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Trips {
        Table,
        Id,
        VehicleId,
        DriverId,
        FromLocationId,
        ToLocationId,
        TripDate,
        DistanceKm,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240201_000009_create_rate_cards_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000009_create_rate_cards_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RateCards::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RateCards::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateCards::Material).string().not_null())
                        .col(ColumnDef::new(RateCards::Unit).string().not_null())
                        .col(
                            ColumnDef::new(RateCards::BuyRate)
                                .decimal_len(19, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateCards::SellRate)
                                .decimal_len(19, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateCards::EffectiveFrom).date().not_null())
                        .col(ColumnDef::new(RateCards::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(RateCards::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rate_cards_material_effective")
                        .table(RateCards::Table)
                        .col(RateCards::Material)
                        .col(RateCards::EffectiveFrom)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RateCards::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RateCards {
        Table,
        Id,
        Material,
        Unit,
        BuyRate,
        SellRate,
        EffectiveFrom,
        CreatedAt,
        UpdatedAt,
    }
}
