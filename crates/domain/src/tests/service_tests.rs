// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AppointmentService, CatalogService, DomainError, resolve_service_lines};

fn catalog() -> Vec<CatalogService> {
    vec![
        CatalogService::new("Haircut", 30)
            .unwrap()
            .with_service_id(1),
        CatalogService::new("Beard trim", 15)
            .unwrap()
            .with_service_id(2),
        CatalogService::new("Perm", 120)
            .unwrap()
            .with_service_id(3)
            .with_active(false),
    ]
}

#[test]
fn test_catalog_service_validation() {
    assert!(matches!(
        CatalogService::new("", 30),
        Err(DomainError::InvalidServiceDefinition { .. })
    ));
    assert!(matches!(
        CatalogService::new("Wash", 0),
        Err(DomainError::InvalidServiceDefinition { .. })
    ));
}

#[test]
fn test_resolve_keeps_request_order_and_dedupes() {
    let lines = resolve_service_lines(&[2, 1, 2], &catalog()).unwrap();
    assert_eq!(
        lines,
        vec![
            AppointmentService {
                service_id: 2,
                duration_minutes: 15,
            },
            AppointmentService {
                service_id: 1,
                duration_minutes: 30,
            },
        ]
    );
}

#[test]
fn test_resolve_rejects_unknown_service() {
    let result = resolve_service_lines(&[1, 42], &catalog());
    assert_eq!(
        result,
        Err(DomainError::InvalidServices {
            service_ids: vec![42],
            reason: String::from("unknown service"),
        })
    );
}

#[test]
fn test_resolve_rejects_inactive_service() {
    let result = resolve_service_lines(&[3], &catalog());
    assert!(matches!(
        result,
        Err(DomainError::InvalidServices { service_ids, .. }) if service_ids == vec![3]
    ));
}

#[test]
fn test_resolve_reports_every_bad_id() {
    let result = resolve_service_lines(&[42, 3, 1], &catalog());
    assert!(matches!(
        result,
        Err(DomainError::InvalidServices { service_ids, .. }) if service_ids == vec![42, 3]
    ));
}

#[test]
fn test_resolve_empty_request() {
    assert!(resolve_service_lines(&[], &catalog()).unwrap().is_empty());
}
