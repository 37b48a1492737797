use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create scrape_sites table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeSites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeSites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ScrapeSites::BaseUrl).string().not_null())
                    .col(
                        ColumnDef::new(ScrapeSites::StartPath)
                            .string()
                            .not_null()
                            .default("/"),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::QuoteSelector)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::AuthorSelector)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::PaginationSelector)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::MaxPages)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::RateLimitMs)
                            .integer()
                            .not_null()
                            .default(500),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeSites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create authors table
        manager
            .create_table(
                Table::create()
                    .table(Authors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Authors::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Authors::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Authors::BioUrl).string())
                    .col(
                        ColumnDef::new(Authors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Authors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create scrape_jobs table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeJobs::SiteId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScrapeJobs::FinishedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScrapeJobs::QuotesFetched)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::QuotesSaved)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::ErrorsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::Initiator)
                            .string()
                            .not_null()
                            .default("api"),
                    )
                    .col(ColumnDef::new(ScrapeJobs::Meta).json())
                    .col(
                        ColumnDef::new(ScrapeJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrape_jobs_site")
                            .from(ScrapeJobs::Table, ScrapeJobs::SiteId)
                            .to(ScrapeSites::Table, ScrapeSites::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create quotes table
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::Text).text().not_null())
                    .col(ColumnDef::new(Quotes::AuthorId).uuid())
                    .col(ColumnDef::new(Quotes::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::SourceUrl).string())
                    .col(
                        ColumnDef::new(Quotes::Hash)
                            .char_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Quotes::SavedByJob).uuid())
                    .col(
                        ColumnDef::new(Quotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Quotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_author")
                            .from(Quotes::Table, Quotes::AuthorId)
                            .to(Authors::Table, Authors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_site")
                            .from(Quotes::Table, Quotes::SiteId)
                            .to(ScrapeSites::Table, ScrapeSites::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_saved_by_job")
                            .from(Quotes::Table, Quotes::SavedByJob)
                            .to(ScrapeJobs::Table, ScrapeJobs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create scrape_errors table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeErrors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeErrors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeErrors::JobId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeErrors::Url).string())
                    .col(ColumnDef::new(ScrapeErrors::ErrorType).string().not_null())
                    .col(ColumnDef::new(ScrapeErrors::Message).text().not_null())
                    .col(ColumnDef::new(ScrapeErrors::Traceback).text())
                    .col(
                        ColumnDef::new(ScrapeErrors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeErrors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrape_errors_job")
                            .from(ScrapeErrors::Table, ScrapeErrors::JobId)
                            .to(ScrapeJobs::Table, ScrapeJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeErrors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScrapeJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Authors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScrapeSites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeSites {
    Table,
    Id,
    Name,
    BaseUrl,
    StartPath,
    QuoteSelector,
    AuthorSelector,
    PaginationSelector,
    MaxPages,
    RateLimitMs,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Authors {
    Table,
    Id,
    Name,
    BioUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScrapeJobs {
    Table,
    Id,
    SiteId,
    Status,
    StartedAt,
    FinishedAt,
    QuotesFetched,
    QuotesSaved,
    ErrorsCount,
    Initiator,
    Meta,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
    Text,
    AuthorId,
    SiteId,
    SourceUrl,
    Hash,
    SavedByJob,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScrapeErrors {
    Table,
    Id,
    JobId,
    Url,
    ErrorType,
    Message,
    Traceback,
    CreatedAt,
    UpdatedAt,
}
