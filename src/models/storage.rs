//! Storage account, access key and blob container models.

use super::ProvisioningProperties;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sku {
    pub name: String,
}

/// Body of a create storage account request.
#[derive(Serialize, Debug, Clone)]
pub struct StorageAccountCreate<'a> {
    pub sku: Sku,
    pub kind: &'a str,
    pub location: &'a str,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl<'a> StorageAccountCreate<'a> {
    /// Standard locally redundant general purpose v2 account.
    pub fn standard_lrs(location: &'a str) -> Self {
        StorageAccountCreate {
            sku: Sku {
                name: "Standard_LRS".to_string(),
            },
            kind: "StorageV2",
            location,
            properties: serde_json::Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StorageAccount {
    pub id: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub sku: Option<Sku>,
    #[serde(default)]
    pub properties: ProvisioningProperties,
}

impl StorageAccount {
    pub fn provisioning_state(&self) -> &str {
        self.properties
            .provisioning_state
            .as_deref()
            .unwrap_or("Unknown")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    pub key_name: String,
    pub value: String,
    pub permissions: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AccountListKeysResult {
    #[serde(default)]
    pub keys: Vec<AccessKey>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlobContainer {
    pub id: Option<String>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::from_json;

    #[test]
    fn test_create_body() {
        let body = serde_json::to_value(StorageAccountCreate::standard_lrs("eastus")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "sku": { "name": "Standard_LRS" },
                "kind": "StorageV2",
                "location": "eastus",
                "properties": {}
            })
        );
    }

    #[test]
    fn test_parse_account() {
        let body = r#"{
            "id": "/subscriptions/0000/resourceGroups/Quickstart-RG/providers/Microsoft.Storage/storageAccounts/acct123456",
            "name": "acct123456",
            "location": "eastus",
            "kind": "StorageV2",
            "sku": { "name": "Standard_LRS", "tier": "Standard" },
            "properties": { "provisioningState": "Succeeded", "primaryLocation": "eastus" }
        }"#;
        let account: StorageAccount = from_json(body).expect("parse");
        assert_eq!(account.name, "acct123456");
        assert_eq!(account.provisioning_state(), "Succeeded");
    }

    #[test]
    fn test_parse_account_without_properties() {
        let account: StorageAccount = from_json(r#"{"name":"acct1"}"#).expect("parse");
        assert_eq!(account.provisioning_state(), "Unknown");
    }

    #[test]
    fn test_parse_keys() {
        let body = r#"{"keys":[
            {"keyName":"key1","value":"AAAA","permissions":"FULL"},
            {"keyName":"key2","value":"BBBB","permissions":"FULL"},
            {"keyName":"kerb1","value":"CCCC","permissions":"READ"}
        ]}"#;
        let keys: AccountListKeysResult = from_json(body).expect("parse");
        assert_eq!(keys.keys.len(), 3);
        assert_eq!(keys.keys[0].key_name, "key1");
        assert_eq!(keys.keys[0].value, "AAAA");
    }

    #[test]
    fn test_parse_container() {
        let body = r#"{"id":"/x/containers/cont1","name":"cont1","type":"Microsoft.Storage/storageAccounts/blobServices/containers","properties":{}}"#;
        let container: BlobContainer = from_json(body).expect("parse");
        assert_eq!(container.name, "cont1");
    }
}
