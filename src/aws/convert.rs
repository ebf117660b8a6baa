//! SDK output conversion
//!
//! Renders typed `GetResources` output as the JSON document the service
//! returns on the wire, with its camelCase keys and a `ResponseMetadata`
//! block. Key normalization happens later, in one place, for every source.

use aws_sdk_apigateway::operation::get_resources::GetResourcesOutput;
use aws_sdk_apigateway::operation::RequestId;
use aws_sdk_apigateway::types::{Method, Resource};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Convert a `GetResources` page
pub fn get_resources_output_to_json(output: &GetResourcesOutput) -> Value {
    let mut page = Map::new();

    page.insert(
        "items".to_string(),
        Value::Array(output.items().iter().map(resource_to_json).collect()),
    );
    insert_str(&mut page, "position", output.position());

    let mut metadata = Map::new();
    insert_str(&mut metadata, "RequestId", output.request_id());
    metadata.insert("HTTPStatusCode".to_string(), Value::from(200));
    // SDK-level retries are disabled on this client
    metadata.insert("RetryAttempts".to_string(), Value::from(0));
    page.insert("ResponseMetadata".to_string(), Value::Object(metadata));

    Value::Object(page)
}

/// Convert a single resource tree node
pub fn resource_to_json(resource: &Resource) -> Value {
    let mut map = Map::new();

    insert_str(&mut map, "id", resource.id());
    insert_str(&mut map, "parentId", resource.parent_id());
    insert_str(&mut map, "pathPart", resource.path_part());
    insert_str(&mut map, "path", resource.path());

    if let Some(methods) = resource.resource_methods() {
        let methods = methods
            .iter()
            .map(|(verb, method)| (verb.clone(), method_to_json(method)))
            .collect();
        map.insert("resourceMethods".to_string(), Value::Object(methods));
    }

    Value::Object(map)
}

/// Convert a method stub. Without `embed` the service returns these empty,
/// so only the scalar and map attributes are carried.
fn method_to_json(method: &Method) -> Value {
    let mut map = Map::new();

    insert_str(&mut map, "httpMethod", method.http_method());
    insert_str(&mut map, "authorizationType", method.authorization_type());
    insert_str(&mut map, "authorizerId", method.authorizer_id());
    if let Some(required) = method.api_key_required() {
        map.insert("apiKeyRequired".to_string(), Value::Bool(required));
    }
    insert_str(&mut map, "requestValidatorId", method.request_validator_id());
    insert_str(&mut map, "operationName", method.operation_name());

    if let Some(parameters) = method.request_parameters() {
        map.insert(
            "requestParameters".to_string(),
            string_map_to_json(parameters, |v| Value::Bool(*v)),
        );
    }
    if let Some(models) = method.request_models() {
        map.insert(
            "requestModels".to_string(),
            string_map_to_json(models, |v| Value::String(v.clone())),
        );
    }
    if !method.authorization_scopes().is_empty() {
        map.insert(
            "authorizationScopes".to_string(),
            Value::from(method.authorization_scopes().to_vec()),
        );
    }

    Value::Object(map)
}

fn string_map_to_json<V>(map: &HashMap<String, V>, f: impl Fn(&V) -> Value) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), f(v))).collect())
}

fn insert_str(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}
