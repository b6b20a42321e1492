use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::circuit::Circuit;
use crate::dihedral::CnotDihedral;

impl Serialize for Circuit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Circuit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string
            .parse()
            .map_err(|error| de::Error::custom(format!("failed to parse Circuit: {error}")))
    }
}

/// Serialized as the text of its synthesized circuit.
impl Serialize for CnotDihedral {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let circuit = self.to_circuit().map_err(serde::ser::Error::custom)?;
        circuit.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CnotDihedral {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let circuit = Circuit::deserialize(deserializer)?;
        let element = CnotDihedral::from_circuit(&circuit)
            .map_err(|error| de::Error::custom(format!("failed to parse CnotDihedral: {error}")))?;
        element
            .validate()
            .map_err(|error| de::Error::custom(format!("failed to parse CnotDihedral: {error}")))?;
        Ok(element)
    }
}
