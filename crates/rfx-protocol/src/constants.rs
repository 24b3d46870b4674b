/// Registry of every known service and its deployed versions.
pub const GRPC_SERVICES_PATH: &str = "/grpcServices";
/// Service definitions exposed at one endpoint.
pub const SERVICES_PATH: &str = "/services";
/// Methods of one service definition.
pub const METHODS_PATH: &str = "/methods";
/// Request fields of one method.
pub const FIELDS_PATH: &str = "/fields";

pub const URL_PARAM: &str = "url";
pub const SERVICE_PARAM: &str = "service";
pub const METHOD_PARAM: &str = "method";

/// Header checked by the reflection server's access-token guard.
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Label rendered in place of an empty field list.
pub const NO_FIELD_LABEL: &str = "no field";
