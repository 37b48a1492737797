use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_author_id")
                    .table(Quotes::Table)
                    .col(Quotes::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_site_id")
                    .table(Quotes::Table)
                    .col(Quotes::SiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_site_status")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::SiteId)
                    .col(ScrapeJobs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_errors_job_id")
                    .table(ScrapeErrors::Table)
                    .col(ScrapeErrors::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_quotes_author_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_quotes_site_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrape_jobs_site_status")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_scrape_errors_job_id").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    AuthorId,
    SiteId,
}

#[derive(DeriveIden)]
enum ScrapeJobs {
    Table,
    SiteId,
    Status,
}

#[derive(DeriveIden)]
enum ScrapeErrors {
    Table,
    JobId,
}
