use schemars::json_schema;
use schemars::JsonSchema;

use crate::circuit::Circuit;
use crate::dihedral::CnotDihedral;

impl JsonSchema for Circuit {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("Circuit")
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        json_schema!({
            "type": "string",
            "description": "A circuit over CNOT-dihedral generators. \
                            The first line is 'qubits N', followed by one instruction per line: \
                            a gate name (I, X, Y, Z, T, TInv, S, SInv, ControlledX, ControlledZ, Swap) \
                            and its qubit indices separated by spaces.",
            "examples": [
                "qubits 1\nT 0",
                "qubits 2\nControlledX 0 1\nS 1"
            ]
        })
    }
}

impl JsonSchema for CnotDihedral {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("CnotDihedral")
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        let mut schema = Circuit::json_schema(generator);
        schema.insert(
            "description".to_owned(),
            "A CNOT-dihedral group element, written as a circuit that implements it \
             (see Circuit)."
                .into(),
        );
        schema
    }
}
