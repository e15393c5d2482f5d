//! Shared record types used by the unit tests.

use crate::{
    schema::{EntityKind, EntitySchema, FieldKind, FieldRead, FieldSchema, FieldType, FieldValues},
    value::Value,
};
use chrono::NaiveDate;

///
/// Address
///

#[derive(Clone, Debug, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

static ADDRESS_SCHEMA: EntitySchema = EntitySchema {
    path: "fixtures::Address",
    fields: &[
        FieldSchema {
            name: "city",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: false,
        },
        FieldSchema {
            name: "zip",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: true,
        },
    ],
};

impl FieldValues for Address {
    fn get_value(&self, field: &str) -> Option<FieldRead<'_>> {
        match field {
            "city" => Some(FieldRead::Value(self.city.clone().into())),
            "zip" => Some(FieldRead::Value(self.zip.clone().into())),
            _ => None,
        }
    }
}

impl EntityKind for Address {
    const PATH: &'static str = "fixtures::Address";
    const SCHEMA: &'static EntitySchema = &ADDRESS_SCHEMA;
}

///
/// Customer
///

#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub age: u64,
    pub score: f64,
    pub active: bool,
    pub nickname: Option<String>,
    pub signup: NaiveDate,
    pub address: Option<Address>,
}

static CUSTOMER_SCHEMA: EntitySchema = EntitySchema {
    path: "fixtures::Customer",
    fields: &[
        FieldSchema {
            name: "first_name",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: false,
        },
        FieldSchema {
            name: "last_name",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: false,
        },
        FieldSchema {
            name: "age",
            kind: FieldKind::Field,
            ty: FieldType::Uint,
            nullable: false,
        },
        FieldSchema {
            name: "score",
            kind: FieldKind::Field,
            ty: FieldType::Float,
            nullable: false,
        },
        FieldSchema {
            name: "active",
            kind: FieldKind::Field,
            ty: FieldType::Bool,
            nullable: false,
        },
        FieldSchema {
            name: "nickname",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: true,
        },
        FieldSchema {
            name: "signup",
            kind: FieldKind::Field,
            ty: FieldType::Date,
            nullable: false,
        },
        FieldSchema {
            name: "address",
            kind: FieldKind::Field,
            ty: FieldType::Nested(&ADDRESS_SCHEMA),
            nullable: true,
        },
        FieldSchema {
            name: "full_name",
            kind: FieldKind::Accessor,
            ty: FieldType::Text,
            nullable: false,
        },
    ],
};

impl Customer {
    pub fn sample(first_name: &str, last_name: &str, age: u64) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            score: 0.0,
            active: true,
            nickname: None,
            signup: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl FieldValues for Customer {
    fn get_value(&self, field: &str) -> Option<FieldRead<'_>> {
        match field {
            "first_name" => Some(FieldRead::Value(self.first_name.clone().into())),
            "last_name" => Some(FieldRead::Value(self.last_name.clone().into())),
            "age" => Some(FieldRead::Value(self.age.into())),
            "score" => Some(FieldRead::Value(self.score.into())),
            "active" => Some(FieldRead::Value(self.active.into())),
            "nickname" => Some(FieldRead::Value(self.nickname.clone().into())),
            "signup" => Some(FieldRead::Value(self.signup.into())),
            "address" => match &self.address {
                Some(address) => Some(FieldRead::Nested(address)),
                None => Some(FieldRead::Value(Value::Null)),
            },
            "full_name" => Some(FieldRead::Value(self.full_name().into())),
            _ => None,
        }
    }
}

impl EntityKind for Customer {
    const PATH: &'static str = "fixtures::Customer";
    const SCHEMA: &'static EntitySchema = &CUSTOMER_SCHEMA;
}

///
/// Prospect
///
/// Structurally overlaps Customer on `first_name` and `age`, for retarget
/// tests.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Prospect {
    pub first_name: String,
    pub age: u64,
}

static PROSPECT_SCHEMA: EntitySchema = EntitySchema {
    path: "fixtures::Prospect",
    fields: &[
        FieldSchema {
            name: "first_name",
            kind: FieldKind::Field,
            ty: FieldType::Text,
            nullable: false,
        },
        FieldSchema {
            name: "age",
            kind: FieldKind::Field,
            ty: FieldType::Uint,
            nullable: false,
        },
    ],
};

impl FieldValues for Prospect {
    fn get_value(&self, field: &str) -> Option<FieldRead<'_>> {
        match field {
            "first_name" => Some(FieldRead::Value(self.first_name.clone().into())),
            "age" => Some(FieldRead::Value(self.age.into())),
            _ => None,
        }
    }
}

impl EntityKind for Prospect {
    const PATH: &'static str = "fixtures::Prospect";
    const SCHEMA: &'static EntitySchema = &PROSPECT_SCHEMA;
}

///
/// Order
///
/// Minimal two-key record for multi-key sort tests.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub category: i64,
    pub total: i64,
}

static ORDER_SCHEMA: EntitySchema = EntitySchema {
    path: "fixtures::Order",
    fields: &[
        FieldSchema {
            name: "category",
            kind: FieldKind::Field,
            ty: FieldType::Int,
            nullable: false,
        },
        FieldSchema {
            name: "total",
            kind: FieldKind::Field,
            ty: FieldType::Int,
            nullable: false,
        },
    ],
};

impl FieldValues for Order {
    fn get_value(&self, field: &str) -> Option<FieldRead<'_>> {
        match field {
            "category" => Some(FieldRead::Value(self.category.into())),
            "total" => Some(FieldRead::Value(self.total.into())),
            _ => None,
        }
    }
}

impl EntityKind for Order {
    const PATH: &'static str = "fixtures::Order";
    const SCHEMA: &'static EntitySchema = &ORDER_SCHEMA;
}
