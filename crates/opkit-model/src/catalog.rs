//! Built-in operation catalog.
//!
//! A small hand-written table covering ARC Zonal Shift, MQ, and Account
//! operations. Between them these exercise the whole engine surface:
//! required and optional parameters, enums, aliases, pipeline binding,
//! composite sub-objects, pagination, and the confirmation gate.

use serde_json::json;

use crate::descriptor::{ParamDescriptor, ParamKind};
use crate::schema::{Catalog, OperationSchema};

/// Build the built-in catalog.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![
        list_zonal_shifts(),
        start_zonal_shift(),
        cancel_zonal_shift(),
        update_broker(),
        get_account_information(),
    ])
}

fn list_zonal_shifts() -> OperationSchema {
    OperationSchema::new("ListZonalShifts", "arc-zonal-shift", "Get-ZonalShiftList")
        .param(ParamDescriptor::new(
            "Status",
            ParamKind::Enum(vec!["ACTIVE", "EXPIRED", "CANCELED"]),
        ))
        .param(ParamDescriptor::new("MaxResults", ParamKind::Integer))
        .param(ParamDescriptor::new("NextToken", ParamKind::String))
        .output(&["Items", "NextToken"])
        .select("Items")
        .paginated("NextToken", "NextToken", Some("MaxResults"))
}

fn start_zonal_shift() -> OperationSchema {
    OperationSchema::new("StartZonalShift", "arc-zonal-shift", "Start-ZonalShift")
        .mutating()
        .param(
            ParamDescriptor::new("ResourceIdentifier", ParamKind::String)
                .required()
                .pipeline_bound()
                .alias("Resource"),
        )
        .param(ParamDescriptor::new("AwayFrom", ParamKind::String).required())
        .param(ParamDescriptor::new("ExpiresIn", ParamKind::String).required())
        .param(ParamDescriptor::new("Comment", ParamKind::String))
        .output(&[
            "ZonalShiftId",
            "ResourceIdentifier",
            "AwayFrom",
            "ExpiryTime",
            "StartTime",
            "Status",
            "Comment",
        ])
}

fn cancel_zonal_shift() -> OperationSchema {
    OperationSchema::new("CancelZonalShift", "arc-zonal-shift", "Stop-ZonalShift")
        .mutating()
        .param(
            ParamDescriptor::new("ZonalShiftId", ParamKind::String)
                .required()
                .pipeline_bound(),
        )
        .output(&[
            "ZonalShiftId",
            "ResourceIdentifier",
            "AwayFrom",
            "ExpiryTime",
            "StartTime",
            "Status",
            "Comment",
        ])
}

fn update_broker() -> OperationSchema {
    OperationSchema::new("UpdateBroker", "mq", "Update-MQBroker")
        .mutating()
        .param(
            ParamDescriptor::new("BrokerId", ParamKind::String)
                .required()
                .pipeline_bound(),
        )
        .param(ParamDescriptor::new(
            "AutoMinorVersionUpgrade",
            ParamKind::Boolean,
        ))
        .param(ParamDescriptor::new(
            "MaintenanceWindowStartTime",
            ParamKind::Object(vec![
                ParamDescriptor::new(
                    "DayOfWeek",
                    ParamKind::Enum(vec![
                        "MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY",
                        "SUNDAY",
                    ]),
                ),
                ParamDescriptor::new("TimeOfDay", ParamKind::String),
                ParamDescriptor::new("TimeZone", ParamKind::String).with_default(json!("UTC")),
            ]),
        ))
        .param(ParamDescriptor::new(
            "Logs",
            ParamKind::Object(vec![
                ParamDescriptor::new("Audit", ParamKind::Boolean),
                ParamDescriptor::new("General", ParamKind::Boolean),
            ]),
        ))
        .param(ParamDescriptor::new(
            "SecurityGroups",
            ParamKind::List(Box::new(ParamKind::String)),
        ))
        .output(&[
            "BrokerId",
            "AutoMinorVersionUpgrade",
            "MaintenanceWindowStartTime",
            "Logs",
            "SecurityGroups",
        ])
        .select("BrokerId")
}

fn get_account_information() -> OperationSchema {
    OperationSchema::new("GetAccountInformation", "account", "Get-AccountInformation")
        .output(&["AccountId", "AccountName", "AccountCreatedDate"])
}
