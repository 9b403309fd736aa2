use slideport_core::{DocHandle, Geometry, GeometryPatch, LayoutType, PresentationId};
use slideport_host::{HostFault, MemoryHost};

use super::DeckService;
use crate::error::ApiError;

fn service() -> (DeckService, MemoryHost) {
    let (mut service, host) = DeckService::in_memory(true);
    service.initialize().unwrap();
    (service, host)
}

/// A presentation with slides `[title, title_and_content]`.
fn deck(service: &mut DeckService) -> (String, Vec<String>) {
    let created = service.create_presentation().unwrap();
    let pid = created.id.to_string();
    service.add_slide(&pid, None).unwrap();
    let slides = service
        .get_slides(&pid)
        .unwrap()
        .slides
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    (pid, slides)
}

fn doc_of(service: &DeckService, pid: &str) -> DocHandle {
    let id: PresentationId = pid.parse().unwrap();
    service.registry().presentation(id).unwrap().handle
}

fn slide_order(service: &mut DeckService, pid: &str) -> Vec<String> {
    service
        .get_slides(pid)
        .unwrap()
        .slides
        .into_iter()
        .map(|s| s.id.to_string())
        .collect()
}

#[test]
fn ids_are_namespaced_and_sequential() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    assert_eq!(pid, "pres-1");
    assert_eq!(slides, vec!["slide-1", "slide-2"]);

    let added = service.add_slide(&pid, Some("blank")).unwrap();
    assert_eq!(added.slide_id.to_string(), "slide-3");
    assert_eq!(added.position, 3);
    assert!(added.shape_ids.is_empty());
}

#[test]
fn add_slide_registers_placeholders() {
    let (mut service, _host) = service();
    let (pid, _) = deck(&mut service);
    let added = service.add_slide(&pid, Some("two_content")).unwrap();
    assert_eq!(added.layout, LayoutType::TwoContent);
    assert_eq!(added.shape_ids.len(), 3);

    let listed = service
        .list_all_shapes_in_slide(&pid, &added.slide_id.to_string())
        .unwrap();
    let listed: Vec<_> = listed.shapes.into_iter().map(|s| s.id).collect();
    assert_eq!(listed, added.shape_ids);
}

#[test]
fn unknown_layout_is_a_validation_error() {
    let (mut service, _host) = service();
    let (pid, _) = deck(&mut service);
    let err = service.add_slide(&pid, Some("photo_album")).unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert_eq!(service.get_slides(&pid).unwrap().slide_count, 2);
}

#[test]
fn malformed_ids_are_validation_errors_and_unknown_ids_not_found() {
    let (mut service, _host) = service();
    let (pid, _) = deck(&mut service);

    let err = service.get_slides("presentation-1").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = service.get_slide_text(&pid, "slide-x").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service.get_slides("pres-99").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let err = service.get_slide_text(&pid, "slide-99").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn slide_ids_are_scoped_to_their_presentation() {
    let (mut service, _host) = service();
    let (_, slides) = deck(&mut service);
    let other = service.create_presentation().unwrap().id.to_string();
    let err = service.get_slide_text(&other, &slides[0]).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn copy_slide_places_copy_after_insert_position() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    service.set_slide_title(&pid, &slides[1], "Agenda").unwrap();

    let copied = service.copy_slide(&pid, &slides[1], Some(0)).unwrap();
    assert_eq!(copied.position, 1);
    assert_eq!(copied.source_slide_id.to_string(), slides[1]);

    let order = slide_order(&mut service, &pid);
    assert_eq!(
        order,
        vec![copied.slide_id.to_string(), slides[0].clone(), slides[1].clone()]
    );

    let text = service
        .get_slide_text(&pid, &copied.slide_id.to_string())
        .unwrap();
    assert_eq!(text.combined, "Agenda");
    assert!(text.texts.iter().all(|t| copied.shape_ids.contains(&t.shape_id)));
}

#[test]
fn copy_slide_defaults_to_the_end() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let copied = service.copy_slide(&pid, &slides[0], None).unwrap();
    assert_eq!(copied.position, 3);
    assert_eq!(slide_order(&mut service, &pid)[2], copied.slide_id.to_string());
}

#[test]
fn copy_slide_shapes_get_fresh_ids() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let source = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let copied = service.copy_slide(&pid, &slides[1], Some(2)).unwrap();

    assert_eq!(copied.shape_ids.len(), source.shape_count);
    for id in &copied.shape_ids {
        assert!(source.shapes.iter().all(|s| s.id != *id));
    }
    let original = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let before: Vec<_> = source.shapes.iter().map(|s| s.id).collect();
    let after: Vec<_> = original.shapes.iter().map(|s| s.id).collect();
    assert_eq!(before, after);
}

#[test]
fn copy_slide_rejects_insert_past_end_without_touching_host() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let err = service.copy_slide(&pid, &slides[0], Some(3)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(service.get_slides(&pid).unwrap().slide_count, 2);
}

#[test]
fn failed_move_rolls_back_the_duplicate() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    host.fail_next(HostFault::MoveSlide);

    let err = service.copy_slide(&pid, &slides[1], Some(0)).unwrap_err();
    assert!(matches!(err, ApiError::HostOperation(_)));
    assert_eq!(slide_order(&mut service, &pid), slides);
}

#[test]
fn last_slide_cannot_be_deleted() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);

    let deleted = service.delete_slide(&pid, &slides[0]).unwrap();
    assert_eq!(deleted.slide_count, 1);
    let err = service.get_slide_text(&pid, &slides[0]).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = service.delete_slide(&pid, &slides[1]).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(service.get_slides(&pid).unwrap().slide_count, 1);
}

#[test]
fn delete_slide_evicts_its_shapes() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    service.delete_slide(&pid, &slides[1]).unwrap();
    for shape in shapes.shapes {
        assert!(!service.registry().contains_shape(shape.id));
    }
}

#[test]
fn move_slide_keeps_ids_and_checks_bounds() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);

    let moved = service.move_slide(&pid, &slides[1], 1).unwrap();
    assert_eq!(moved.position, 1);
    assert_eq!(slide_order(&mut service, &pid), vec![slides[1].clone(), slides[0].clone()]);

    for position in [0, 3] {
        let err = service.move_slide(&pid, &slides[0], position).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)), "position {position}");
    }
}

#[test]
fn close_invalidates_every_descendant_id() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();

    service.close_presentation(&pid, false).unwrap();
    assert!(service.registry().is_empty());
    assert!(matches!(
        service.get_presentation_info(&pid).unwrap_err(),
        ApiError::NotFound(_)
    ));
    let shape = shapes.shapes[0].id.to_string();
    assert!(matches!(
        service.update_text(&pid, &slides[1], &shape, "x").unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[test]
fn closing_an_unsaved_document_with_save_fails_and_keeps_it_open() {
    let (mut service, _host) = service();
    let (pid, _) = deck(&mut service);
    let err = service.close_presentation(&pid, true).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(service.get_presentation_info(&pid).is_ok());
}

#[test]
fn slide_text_skips_blank_frames() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let body = shapes.shapes[1].id.to_string();

    service.set_slide_title(&pid, &slides[1], "Plan").unwrap();
    service.update_text(&pid, &slides[1], &body, "Ship it").unwrap();
    let text = service.get_slide_text(&pid, &slides[1]).unwrap();
    assert_eq!(text.texts.len(), 2);
    assert_eq!(text.combined, "Plan\nShip it");

    let first = service.get_slide_text(&pid, &slides[0]).unwrap();
    assert!(first.texts.is_empty());
    assert_eq!(first.combined, "");
}

#[test]
fn title_requires_a_title_placeholder() {
    let (mut service, _host) = service();
    let (pid, _) = deck(&mut service);
    let blank = service.add_slide(&pid, Some("blank")).unwrap();
    let err = service
        .set_slide_title(&pid, &blank.slide_id.to_string(), "Nope")
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn set_title_shows_up_in_slide_listing() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    service.set_slide_title(&pid, &slides[0], "Welcome").unwrap();
    let listed = service.get_slides(&pid).unwrap();
    assert_eq!(listed.slides[0].title.as_deref(), Some("Welcome"));
    assert_eq!(listed.slides[1].title, None);
}

#[test]
fn text_operations_reject_pictures() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let doc = doc_of(&service, &pid);
    host.ui_insert_picture(doc, 1, Geometry::new(10.0, 10.0, 100.0, 80.0), "logo.png")
        .unwrap();

    let shapes = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    let picture = shapes.shapes.last().unwrap().id.to_string();
    let err = service
        .update_text(&pid, &slides[0], &picture, "caption")
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = service
        .set_text_font_size(&pid, &slides[0], &picture, 12.0)
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn font_changes_are_validated_then_applied() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let title = shapes.shapes[0].id.to_string();

    for size in [0.0, -3.0, 5000.0, f64::NAN] {
        let err = service
            .set_text_font_size(&pid, &slides[1], &title, size)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)), "size {size}");
    }
    let err = service
        .set_text_font_name(&pid, &slides[1], &title, "  ")
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let sized = service
        .set_text_font_size(&pid, &slides[1], &title, 28.0)
        .unwrap();
    assert_eq!(sized.font.size, Some(28.0));
    let named = service
        .set_text_font_name(&pid, &slides[1], &title, "Georgia")
        .unwrap();
    assert_eq!(named.font.name.as_deref(), Some("Georgia"));
    assert_eq!(named.font.size, Some(28.0));
}

#[test]
fn text_box_geometry_is_validated_before_the_host() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let err = service
        .add_text_box(&pid, &slides[0], "x", Geometry::new(-1.0, 0.0, 10.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = service
        .add_text_box(&pid, &slides[0], "x", Geometry::new(0.0, 0.0, 0.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let added = service
        .add_text_box(&pid, &slides[0], "Note", Geometry::new(50.0, 60.0, 200.0, 40.0))
        .unwrap();
    let props = service
        .get_shape_properties(&pid, &slides[0], &added.shape_id.to_string())
        .unwrap();
    assert_eq!(props.shape.text.as_deref(), Some("Note"));
    assert_eq!(props.z_order, 3);
}

#[test]
fn shape_position_needs_at_least_one_field() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    let shape = shapes.shapes[0].id.to_string();

    let err = service
        .set_shape_position(&pid, &slides[0], &shape, GeometryPatch::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let before = shapes.shapes[0].geometry;
    let moved = service
        .set_shape_position(
            &pid,
            &slides[0],
            &shape,
            GeometryPatch {
                left: Some(5.0),
                ..GeometryPatch::default()
            },
        )
        .unwrap();
    assert_eq!(moved.geometry.left, 5.0);
    assert_eq!(moved.geometry.width, before.width);
}

#[test]
fn copy_shape_lands_on_target_with_new_id() {
    let (mut service, _host) = service();
    let (pid, slides) = deck(&mut service);
    service.set_slide_title(&pid, &slides[1], "Copied").unwrap();
    let source = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let title = source.shapes[0].id.to_string();

    let copied = service
        .copy_shape(&pid, &slides[1], &title, &slides[0], Some(20.0), None)
        .unwrap();
    assert_eq!(copied.slide_id.to_string(), slides[0]);
    assert_eq!(copied.geometry.left, 20.0);
    assert_eq!(copied.geometry.top, source.shapes[0].geometry.top);
    assert_ne!(copied.shape_id.to_string(), title);

    let props = service
        .get_shape_properties(&pid, &slides[0], &copied.shape_id.to_string())
        .unwrap();
    assert_eq!(props.shape.text.as_deref(), Some("Copied"));
}

#[test]
fn failed_copy_positioning_removes_the_copy() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let source = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let before = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    host.fail_next(HostFault::SetGeometry);

    let err = service
        .copy_shape(
            &pid,
            &slides[1],
            &source.shapes[0].id.to_string(),
            &slides[0],
            Some(1.0),
            Some(1.0),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::HostOperation(_)));
    let after = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    assert_eq!(after.shape_count, before.shape_count);
}

#[test]
fn ids_survive_out_of_band_reordering() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    service.set_slide_title(&pid, &slides[1], "Second").unwrap();
    let doc = doc_of(&service, &pid);

    host.ui_move_slide(doc, 2, 1).unwrap();
    let text = service.get_slide_text(&pid, &slides[1]).unwrap();
    assert_eq!(text.combined, "Second");
    assert_eq!(slide_order(&mut service, &pid), vec![slides[1].clone(), slides[0].clone()]);
}

#[test]
fn ids_follow_cut_and_paste() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    service.set_slide_title(&pid, &slides[1], "Moved").unwrap();
    let doc = doc_of(&service, &pid);

    host.ui_cut_paste_slide(doc, 2, 1).unwrap();
    let text = service.get_slide_text(&pid, &slides[1]).unwrap();
    assert_eq!(text.combined, "Moved");
}

#[test]
fn ids_follow_a_slide_edited_then_cut_and_pasted() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let doc = doc_of(&service, &pid);

    host.ui_set_text(doc, 2, 1, "Edited in UI").unwrap();
    host.ui_cut_paste_slide(doc, 2, 1).unwrap();

    let text = service.get_slide_text(&pid, &slides[1]).unwrap();
    assert_eq!(text.texts.len(), 1);
    assert_eq!(text.texts[0].shape_id, shapes.shapes[0].id);
    assert_eq!(text.combined, "Edited in UI");
    assert_eq!(
        slide_order(&mut service, &pid),
        vec![slides[1].clone(), slides[0].clone()]
    );
}

#[test]
fn out_of_band_deletion_surfaces_as_not_found() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let doc = doc_of(&service, &pid);
    host.ui_delete_slide(doc, 2).unwrap();

    let err = service.get_slide_text(&pid, &slides[1]).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let id = slides[1].parse().unwrap();
    assert!(!service.registry().contains_slide(id));
}

#[test]
fn missing_host_is_a_connection_error() {
    let (mut service, host) = DeckService::in_memory(true);
    host.set_installed(false);
    let err = service.list_presentations().unwrap_err();
    assert!(matches!(err, ApiError::Connection(_)));
}

#[test]
fn host_quit_invalidates_ids_after_reattach() {
    let (mut service, host) = service();
    let (pid, _) = deck(&mut service);
    host.ui_quit();

    let err = service.get_presentation_info(&pid).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(service.list_presentations().unwrap().presentations.is_empty());
}

#[test]
fn selection_maps_handles_to_ids() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let doc = doc_of(&service, &pid);

    host.ui_select_text(doc, 2, 2, "hello").unwrap();
    let selection = service.get_selected_shapes(None).unwrap();
    assert_eq!(selection.presentation_id.to_string(), pid);
    assert_eq!(selection.slide_id.map(|s| s.to_string()), Some(slides[1].clone()));
    assert_eq!(selection.slide_position, Some(2));
    assert_eq!(selection.shapes.len(), 1);
    assert_eq!(selection.shapes[0].id, shapes.shapes[1].id);
    assert_eq!(selection.selected_text.as_deref(), Some("hello"));
}

#[test]
fn selection_of_an_inactive_presentation_is_rejected() {
    let (mut service, _host) = service();
    let (first, _) = deck(&mut service);
    service.create_presentation().unwrap();
    let err = service.get_selected_shapes(Some(&first)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn sections_report_slide_ranges() {
    let (mut service, host) = service();
    let (pid, _) = deck(&mut service);
    service.add_slide(&pid, None).unwrap();
    let empty = service.get_presentation_sections(&pid).unwrap();
    assert!(!empty.has_sections);

    let doc = doc_of(&service, &pid);
    host.ui_add_section(doc, "Body", 2).unwrap();
    let sections = service.get_presentation_sections(&pid).unwrap();
    assert_eq!(sections.total_slides, 3);
    assert_eq!(sections.section_count, 2);
    assert_eq!(sections.sections[0].slide_range.start, 1);
    assert_eq!(sections.sections[0].slide_range.end, 1);
    assert_eq!(sections.sections[1].name, "Body");
    assert_eq!(sections.sections[1].slide_range.start, 2);
    assert_eq!(sections.sections[1].slide_range.count, 2);
}

#[test]
fn execute_json_dispatches_by_op() {
    let (mut service, _host) = service();
    let created = service
        .execute_json(r#"{"op":"create_presentation"}"#)
        .unwrap();
    assert_eq!(created["id"], "pres-1");

    let added = service
        .execute_json(r#"{"op":"add_slide","presentation_id":"pres-1","layout_type":"title_only"}"#)
        .unwrap();
    assert_eq!(added["layout"], "title_only");

    let err = service.execute_json(r#"{"op":"explode"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn failed_save_keeps_previous_file_and_open_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    service
        .save_presentation(&pid, Some(path.to_str().unwrap()))
        .unwrap();
    let saved = std::fs::read(&path).unwrap();
    service.set_slide_title(&pid, &slides[1], "Unsaved").unwrap();

    host.fail_next(HostFault::Save);
    let err = service.save_presentation(&pid, None).unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");
    assert_eq!(std::fs::read(&path).unwrap(), saved);
    assert!(service.get_presentation_info(&pid).unwrap().dirty);

    let registered = service.registry().len();
    host.fail_next(HostFault::Save);
    let err = service.close_presentation(&pid, true).unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");
    assert_eq!(std::fs::read(&path).unwrap(), saved);
    let info = service.get_presentation_info(&pid).unwrap();
    assert!(info.dirty);
    assert_eq!(service.registry().len(), registered);
    assert_eq!(slide_order(&mut service, &pid), slides);
}

#[test]
fn failed_close_keeps_the_presentation_registered() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let registered = service.registry().len();
    host.fail_next(HostFault::Close);

    let err = service.close_presentation(&pid, false).unwrap_err();
    assert!(matches!(err, ApiError::HostOperation(_)));
    assert_eq!(service.registry().len(), registered);
    assert_eq!(slide_order(&mut service, &pid), slides);
}

#[test]
fn failed_save_copy_leaves_document_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    let copy = dir.path().join("copy.pptx");
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let saved = service
        .save_presentation(&pid, Some(path.to_str().unwrap()))
        .unwrap();
    service.set_slide_title(&pid, &slides[0], "Pending").unwrap();

    host.fail_next(HostFault::SaveCopy);
    let err = service.save_copy(&pid, copy.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");
    assert!(!copy.exists());
    let info = service.get_presentation_info(&pid).unwrap();
    assert_eq!(info.path, Some(saved.path));
    assert!(info.dirty);
}

#[test]
fn failed_duplicate_leaves_deck_and_registry_unchanged() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let registered = service.registry().len();
    host.fail_next(HostFault::DuplicateSlide);

    let err = service.copy_slide(&pid, &slides[0], Some(2)).unwrap_err();
    assert!(matches!(err, ApiError::HostOperation(_)));
    assert_eq!(slide_order(&mut service, &pid), slides);
    assert_eq!(service.registry().len(), registered);
}

#[test]
fn failed_add_slide_leaves_deck_and_registry_unchanged() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let registered = service.registry().len();
    host.fail_next(HostFault::AddSlide);

    let err = service.add_slide(&pid, Some("title_only")).unwrap_err();
    assert!(matches!(err, ApiError::HostOperation(_)));
    assert_eq!(slide_order(&mut service, &pid), slides);
    assert_eq!(service.registry().len(), registered);

    let added = service.add_slide(&pid, Some("title_only")).unwrap();
    assert_eq!(added.slide_id.to_string(), "slide-3");
}

#[test]
fn rejected_edits_leave_ids_and_content_alone() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let title = shapes.shapes[0].id.to_string();
    let registered = service.registry().len();

    host.fail_next(HostFault::DeleteSlide);
    let err = service.delete_slide(&pid, &slides[0]).unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    host.fail_next(HostFault::SetText);
    let err = service.update_text(&pid, &slides[1], &title, "Lost").unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    host.fail_next(HostFault::SetFont);
    let err = service
        .set_text_font_size(&pid, &slides[1], &title, 18.0)
        .unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    host.fail_next(HostFault::AddTextBox);
    let err = service
        .add_text_box(&pid, &slides[0], "Lost", Geometry::new(10.0, 10.0, 100.0, 40.0))
        .unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    host.fail_next(HostFault::CopyShape);
    let err = service
        .copy_shape(&pid, &slides[1], &title, &slides[0], None, None)
        .unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    assert_eq!(slide_order(&mut service, &pid), slides);
    assert_eq!(service.registry().len(), registered);
    assert!(service.get_slide_text(&pid, &slides[1]).unwrap().texts.is_empty());
    let after = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    assert_eq!(after.shape_count, 2);
}

#[test]
fn applied_edits_succeed_when_the_refresh_fails() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let shapes = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let body = shapes.shapes[1].id.to_string();

    // One slide listing to resolve, the next one refreshes.
    host.fail_after(HostFault::ListSlides, 1);
    let updated = service.update_text(&pid, &slides[1], &body, "Applied once").unwrap();
    assert_eq!(updated.text, "Applied once");
    let props = service.get_shape_properties(&pid, &slides[1], &body).unwrap();
    assert_eq!(props.shape.text.as_deref(), Some("Applied once"));

    host.fail_after(HostFault::ListSlides, 1);
    let patch = GeometryPatch {
        left: Some(12.0),
        ..GeometryPatch::default()
    };
    let moved = service.set_shape_position(&pid, &slides[1], &body, patch).unwrap();
    assert_eq!(moved.geometry.left, 12.0);

    host.fail_after(HostFault::ListSlides, 1);
    let font = service.set_text_font_size(&pid, &slides[1], &body, 28.0).unwrap();
    assert_eq!(font.font.size, Some(28.0));

    // Resolve and the bounds check list slides before the move.
    host.fail_after(HostFault::ListSlides, 2);
    service.move_slide(&pid, &slides[1], 1).unwrap();
    assert_eq!(
        slide_order(&mut service, &pid),
        vec![slides[1].clone(), slides[0].clone()]
    );

    host.fail_after(HostFault::ListSlides, 2);
    let deleted = service.delete_slide(&pid, &slides[0]).unwrap();
    assert_eq!(deleted.slide_count, 1);
    assert_eq!(slide_order(&mut service, &pid), vec![slides[1].clone()]);
}

#[test]
fn unregistered_new_shapes_are_removed_again() {
    let (mut service, host) = service();
    let (pid, slides) = deck(&mut service);
    let source = service.list_all_shapes_in_slide(&pid, &slides[1]).unwrap();
    let registered = service.registry().len();

    host.fail_after(HostFault::ListSlides, 1);
    let err = service
        .add_text_box(&pid, &slides[0], "Orphan", Geometry::new(10.0, 10.0, 100.0, 40.0))
        .unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    host.fail_after(HostFault::ListSlides, 2);
    let err = service
        .copy_shape(
            &pid,
            &slides[1],
            &source.shapes[0].id.to_string(),
            &slides[0],
            None,
            None,
        )
        .unwrap_err();
    assert_eq!(err.kind(), "HostOperationError");

    let target = service.list_all_shapes_in_slide(&pid, &slides[0]).unwrap();
    assert_eq!(target.shape_count, 2);
    assert_eq!(service.registry().len(), registered);
}
