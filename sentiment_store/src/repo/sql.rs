use diesel::{insert_into, prelude::*};
use news_ingestor::models::{bar::DailyBar, news::ScoredArticle};
use tracing::debug;

use crate::{
    models::{
        ArticleExportRow, ExportTables, NewArticle, NewDailyStockPrice, NewStock, PriceExportRow,
        PriceRecord, SentimentRecord,
    },
    repo::{RepoError, RepoResult, StockRepo},
    schema::{articles, daily_stock_price, stock_list},
};

// One query body per backend. `$write_tx` is the connection method that opens a write
// transaction: SQLite takes the write lock up front (BEGIN IMMEDIATE).
macro_rules! stock_repo_impl {
    ($backend:ident, $conn:ty, $write_tx:ident) => {
        mod $backend {
            use super::*;

            fn stock_id_of(conn: &mut $conn, symbol: &str) -> RepoResult<i32> {
                stock_list::table
                    .filter(stock_list::symbol.eq(symbol))
                    .select(stock_list::stock_id)
                    .first::<i32>(conn)
                    .optional()?
                    .ok_or_else(|| {
                        RepoError::TickerNotFound {
                            symbol: symbol.to_string(),
                        }
                        .into()
                    })
            }

            impl StockRepo for $conn {
                fn ensure_stock(&mut self, symbol: &str) -> RepoResult<i32> {
                    self.$write_tx::<_, anyhow::Error, _>(|conn| {
                        let inserted = insert_into(stock_list::table)
                            .values(&NewStock { symbol })
                            .on_conflict(stock_list::symbol)
                            .do_nothing()
                            .execute(conn)?;
                        if inserted > 0 {
                            debug!(symbol, "registered stock");
                        }
                        stock_id_of(conn, symbol)
                    })
                }

                fn resolve_stock(&mut self, symbol: &str) -> RepoResult<i32> {
                    self.transaction::<_, anyhow::Error, _>(|conn| stock_id_of(conn, symbol))
                }

                fn upsert_articles(
                    &mut self,
                    ticker: &str,
                    items: &[ScoredArticle],
                ) -> RepoResult<usize> {
                    let inserted = self.$write_tx::<_, anyhow::Error, _>(|conn| {
                        let stock_id = stock_id_of(conn, ticker)?;
                        let mut inserted = 0;
                        for a in items {
                            inserted += insert_into(articles::table)
                                .values(&NewArticle {
                                    link: &a.link,
                                    title: &a.title,
                                    publish_date: a.publish_date,
                                    stock_id,
                                    compound_sentiment_score: a.compound_sentiment_score,
                                })
                                .on_conflict(articles::link)
                                .do_nothing()
                                .execute(conn)?;
                        }
                        Ok(inserted)
                    })?;
                    debug!(ticker, offered = items.len(), inserted, "upserted articles");
                    Ok(inserted)
                }

                fn upsert_price_bars(
                    &mut self,
                    ticker: &str,
                    bars: &[DailyBar],
                ) -> RepoResult<usize> {
                    let inserted = self.$write_tx::<_, anyhow::Error, _>(|conn| {
                        let stock_id = stock_id_of(conn, ticker)?;
                        let mut inserted = 0;
                        for b in bars {
                            inserted += insert_into(daily_stock_price::table)
                                .values(&NewDailyStockPrice {
                                    stock_id,
                                    open: b.open,
                                    high: b.high,
                                    low: b.low,
                                    close: b.close,
                                    volume: b.volume,
                                    date: b.date,
                                })
                                .on_conflict((daily_stock_price::date, daily_stock_price::stock_id))
                                .do_nothing()
                                .execute(conn)?;
                        }
                        Ok(inserted)
                    })?;
                    debug!(ticker, offered = bars.len(), inserted, "upserted price bars");
                    Ok(inserted)
                }

                fn list_tickers(&mut self) -> RepoResult<Vec<String>> {
                    self.transaction::<_, anyhow::Error, _>(|conn| {
                        let symbols = stock_list::table
                            .select(stock_list::symbol)
                            .order(stock_list::symbol.asc())
                            .load::<String>(conn)?;
                        Ok(symbols)
                    })
                }

                fn price_history(&mut self, ticker: &str) -> RepoResult<Vec<PriceRecord>> {
                    self.transaction::<_, anyhow::Error, _>(|conn| {
                        let stock_id = stock_id_of(conn, ticker)?;
                        let rows = daily_stock_price::table
                            .filter(daily_stock_price::stock_id.eq(stock_id))
                            .order(daily_stock_price::date.asc())
                            .select(PriceRecord::as_select())
                            .load(conn)?;
                        Ok(rows)
                    })
                }

                fn sentiment_history(
                    &mut self,
                    ticker: &str,
                ) -> RepoResult<Vec<SentimentRecord>> {
                    self.transaction::<_, anyhow::Error, _>(|conn| {
                        let stock_id = stock_id_of(conn, ticker)?;
                        let rows = articles::table
                            .filter(articles::stock_id.eq(stock_id))
                            .order((articles::publish_date.asc(), articles::article_id.asc()))
                            .select(SentimentRecord::as_select())
                            .load(conn)?;
                        Ok(rows)
                    })
                }

                fn export_all(&mut self) -> RepoResult<ExportTables> {
                    self.transaction::<_, anyhow::Error, _>(|conn| {
                        let prices = daily_stock_price::table
                            .inner_join(stock_list::table)
                            .select((
                                stock_list::symbol,
                                daily_stock_price::date,
                                daily_stock_price::open,
                                daily_stock_price::high,
                                daily_stock_price::low,
                                daily_stock_price::close,
                                daily_stock_price::volume,
                            ))
                            .order((stock_list::symbol.asc(), daily_stock_price::date.asc()))
                            .load::<PriceExportRow>(conn)?;

                        let articles = articles::table
                            .inner_join(stock_list::table)
                            .select((
                                stock_list::symbol,
                                articles::link,
                                articles::title,
                                articles::publish_date,
                                articles::compound_sentiment_score,
                            ))
                            .order((
                                stock_list::symbol.asc(),
                                articles::publish_date.asc(),
                                articles::article_id.asc(),
                            ))
                            .load::<ArticleExportRow>(conn)?;

                        Ok(ExportTables { prices, articles })
                    })
                }
            }
        }
    };
}

stock_repo_impl!(sqlite, diesel::SqliteConnection, immediate_transaction);

#[cfg(feature = "postgres")]
stock_repo_impl!(postgres, diesel::PgConnection, transaction);
