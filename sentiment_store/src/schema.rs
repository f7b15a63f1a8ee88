//! Diesel table definitions shared by the SQLite and PostgreSQL backends.
#![allow(missing_docs)]

diesel::table! {
    articles (article_id) {
        article_id -> Integer,
        link -> Text,
        title -> Text,
        publish_date -> Timestamp,
        stock_id -> Integer,
        compound_sentiment_score -> Nullable<Double>,
    }
}

diesel::table! {
    daily_stock_price (dsp_id) {
        dsp_id -> Integer,
        stock_id -> Integer,
        open -> Double,
        high -> Double,
        low -> Double,
        close -> Double,
        volume -> BigInt,
        date -> Date,
    }
}

diesel::table! {
    stock_list (stock_id) {
        stock_id -> Integer,
        symbol -> Text,
    }
}

diesel::joinable!(articles -> stock_list (stock_id));
diesel::joinable!(daily_stock_price -> stock_list (stock_id));

diesel::allow_tables_to_appear_in_same_query!(articles, daily_stock_price, stock_list);
