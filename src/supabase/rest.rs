//! PostgREST table access: select, insert, update, delete.
//!
//! Request construction is split from sending so URL and header shape can be
//! checked without a network.

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SupabaseClient, SupabaseError};

/// Media type asking PostgREST for exactly one row as a bare object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

// =============================================================================
// QUERY
// =============================================================================

/// Horizontal filters and ordering for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_owned(), ascending));
        self
    }

    /// Newest first, the order every listing on the site uses.
    #[must_use]
    pub fn newest_first(self) -> Self {
        self.order("created_at", false)
    }

    /// Query-string pairs, `select=*` first when asked for.
    #[must_use]
    pub fn to_params(&self, select_all: bool) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if select_all {
            params.push(("select".to_owned(), "*".to_owned()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some((column, ascending)) = &self.order {
            let dir = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_owned(), format!("{column}.{dir}")));
        }
        params
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

impl SupabaseClient {
    fn table_request(
        &self,
        method: Method,
        table: &str,
        query: &Query,
        select_all: bool,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let url = self.endpoint(&format!("rest/v1/{table}"));
        let request = self
            .http
            .request(method, url)
            .query(&query.to_params(select_all));
        self.authorize(request, access_token)
    }

    pub(crate) fn select_request(
        &self,
        table: &str,
        query: &Query,
        single: bool,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let request = self.table_request(Method::GET, table, query, true, access_token);
        if single { request.header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT)) } else { request }
    }

    pub(crate) fn insert_request<B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.table_request(Method::POST, table, &Query::new(), true, access_token)
            .header("Prefer", "return=representation")
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .json(&[row])
    }

    pub(crate) fn update_request<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &Query,
        patch: &B,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.table_request(Method::PATCH, table, query, true, access_token)
            .header("Prefer", "return=representation")
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .json(patch)
    }

    pub(crate) fn delete_request(&self, table: &str, query: &Query, access_token: Option<&str>) -> RequestBuilder {
        self.table_request(Method::DELETE, table, query, false, access_token)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Fetch all rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an undecodable body.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, SupabaseError> {
        self.send_json(self.select_request(table, query, false, access_token))
            .await
    }

    /// Fetch exactly one row. Zero rows surfaces as a 406 [`SupabaseError::Api`].
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an undecodable body.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<T, SupabaseError> {
        self.send_json(self.select_request(table, query, true, access_token))
            .await
    }

    /// Insert one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an undecodable body.
    pub async fn insert<B, T>(&self, table: &str, row: &B, access_token: Option<&str>) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.insert_request(table, row, access_token))
            .await
    }

    /// Update the single row matching `query` and return it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an undecodable body.
    pub async fn update<B, T>(
        &self,
        table: &str,
        query: &Query,
        patch: &B,
        access_token: Option<&str>,
    ) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.update_request(table, query, patch, access_token))
            .await
    }

    /// Delete all rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn delete(&self, table: &str, query: &Query, access_token: Option<&str>) -> Result<(), SupabaseError> {
        self.send(self.delete_request(table, query, access_token))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
