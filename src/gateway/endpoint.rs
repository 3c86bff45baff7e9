use reqwest::Method;
use std::time::Duration;

/// Placeholder in route templates substituted with a table name.
pub const NAME_PARAM: &str = "{name}";

/// Defines every backend endpoint once: its public route, the upstream path it
/// forwards to, its timeout and the messages used when it fails.
macro_rules! define_endpoints {
    ( $( $variant:ident: $method:ident $route:literal => $upstream:literal, timeout $secs:expr, activity $activity:literal, fallback $fallback:literal; )* ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Endpoint {
            $( $variant, )*
        }

        impl Endpoint {
            pub const ALL: &'static [Endpoint] = &[ $( Endpoint::$variant, )* ];

            pub fn method(&self) -> Method {
                match self {
                    $( Endpoint::$variant => Method::$method, )*
                }
            }

            /// Path the UI calls on the proxy.
            pub fn route(&self) -> &'static str {
                match self {
                    $( Endpoint::$variant => $route, )*
                }
            }

            /// Path on the backend service the proxy forwards to.
            pub fn upstream(&self) -> &'static str {
                match self {
                    $( Endpoint::$variant => $upstream, )*
                }
            }

            /// `None` leaves the HTTP client's default in place.
            pub fn timeout(&self) -> Option<Duration> {
                match self {
                    $( Endpoint::$variant => $secs.map(Duration::from_secs), )*
                }
            }

            fn activity(&self) -> &'static str {
                match self {
                    $( Endpoint::$variant => $activity, )*
                }
            }

            pub fn fallback_detail(&self) -> &'static str {
                match self {
                    $( Endpoint::$variant => $fallback, )*
                }
            }
        }
    };
}

define_endpoints! {
    ListTables: GET "/api/data/tables" => "/data/tables",
        timeout None::<u64>, activity "table listing", fallback "Failed to fetch tables";
    UploadCsv: POST "/api/data/upload-csv" => "/data/upload-csv",
        timeout None::<u64>, activity "CSV upload", fallback "Failed to upload CSV files";
    UploadDuckdb: POST "/api/data/upload-duckdb" => "/data/upload-duckdb",
        timeout None::<u64>, activity "database upload", fallback "Failed to upload DuckDB file";
    PreviewTable: GET "/api/data/tables/{name}/preview" => "/data/tables/{name}/preview",
        timeout None::<u64>, activity "table preview", fallback "Failed to fetch table preview";
    TableSchema: GET "/api/data/tables/{name}/schema" => "/data/tables/{name}/schema",
        timeout None::<u64>, activity "schema lookup", fallback "Failed to fetch table schema";
    DeleteTable: DELETE "/api/data/tables/{name}" => "/data/tables/{name}",
        timeout None::<u64>, activity "table deletion", fallback "Failed to delete table";
    DataStatus: GET "/api/data/status" => "/data/status",
        timeout None::<u64>, activity "status check", fallback "Failed to fetch data status";
    GenerateResponseTable: POST "/api/generate-response-table" => "/generate-response-table",
        timeout Some(120), activity "response table generation", fallback "Failed to generate response table";
    RegenerateResponseTable: POST "/api/regenerate-response-table" => "/regenerate-response-table",
        timeout Some(120), activity "response table regeneration", fallback "Failed to regenerate response table";
    RunInputQuery: POST "/api/generate-input-query-response-table" => "/generate-input-query-response-table",
        timeout Some(120), activity "query execution", fallback "Failed to run query";
    GenerateQueryPlan: POST "/api/generate-query-plan" => "/generate-query-plan",
        timeout Some(30), activity "query plan generation", fallback "Failed to generate query plan";
    RunWithRefinement: POST "/api/run-query-with-refinement" => "/run-query-with-refinement",
        timeout Some(120), activity "refined query execution", fallback "Failed to run query with refinement";
    GeneratePlotConfig: POST "/api/generate-plot-config" => "/generate-plot-config",
        timeout Some(30), activity "plot configuration generation", fallback "Failed to generate plot config";
}

impl Endpoint {
    /// The fixed message surfaced when the upstream is too slow or drops the connection.
    pub fn timeout_detail(&self) -> String {
        format!("Request timeout - the {} took too long", self.activity())
    }

    pub fn takes_name(&self) -> bool {
        self.route().contains(NAME_PARAM)
    }
}
