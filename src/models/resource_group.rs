//! Resource group model.

use super::ProvisioningProperties;
use serde::{Deserialize, Serialize};

/// Body of a create-or-update resource group request.
#[derive(Serialize, Debug, Clone)]
pub struct ResourceGroupCreate<'a> {
    pub location: &'a str,
}

/// Resource group as returned by ARM.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResourceGroup {
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: ProvisioningProperties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::from_json;

    #[test]
    fn test_parse_resource_group() {
        let body = r#"{
            "id": "/subscriptions/0000/resourceGroups/Quickstart-RG",
            "name": "Quickstart-RG",
            "type": "Microsoft.Resources/resourceGroups",
            "location": "eastus",
            "properties": { "provisioningState": "Succeeded" }
        }"#;
        let group: ResourceGroup = from_json(body).expect("parse");
        assert_eq!(group.name, "Quickstart-RG");
        assert_eq!(group.location, "eastus");
        assert_eq!(
            group.properties.provisioning_state.as_deref(),
            Some("Succeeded")
        );
    }

    #[test]
    fn test_create_body() {
        let body = serde_json::to_string(&ResourceGroupCreate { location: "eastus" }).unwrap();
        assert_eq!(body, r#"{"location":"eastus"}"#);
    }
}
