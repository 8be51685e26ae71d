// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn validated_span(offset: usize, offset_end: usize) -> Result<Span, ApplyError> {
    Span::new(offset, offset_end).map_err(|_| ApplyError::EmptySpan { offset, offset_end })
}

fn segment_for_span(session: &LabelingSession, span: Span) -> Result<&TextSegment, ApplyError> {
    session
        .segments()
        .values()
        .find(|segment| segment.contains_span(span.offset, span.offset_end))
        .ok_or(ApplyError::OutsideSegments {
            offset: span.offset,
            offset_end: span.offset_end,
        })
}

fn rejected(reason: String) -> ApplyError {
    ApplyError::Rejected { reason }
}

fn apply_update_span<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    occurrence_id: &OccurrenceId,
    offset: usize,
    offset_end: usize,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    let span = validated_span(offset, offset_end)?;
    if session.occurrence(occurrence_id).is_none() {
        return Err(ApplyError::NotFound {
            kind: ObjectKind::Occurrence,
            id: occurrence_id.to_string(),
        });
    }
    let alias = segment_for_span(session, span)?.text_of(span.offset, span.offset_end);

    resource
        .update_span(occurrence_id, span, &alias)
        .map_err(rejected)?;

    if let Some(occurrence) = session.occurrences_mut().get_mut(occurrence_id) {
        occurrence.set_span(span.offset, span.offset_end, alias);
    }
    delta.record_updated(occurrence_id.clone());
    Ok(())
}

fn apply_create_occurrence<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    entity_key: &str,
    kind: &EntityKind,
    offset: usize,
    offset_end: usize,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    let span = validated_span(offset, offset_end)?;
    if entity_key.trim().is_empty() {
        return Err(ApplyError::MissingEntity);
    }
    let alias = segment_for_span(session, span)?.text_of(span.offset, span.offset_end);

    let created = resource
        .create_occurrence(&NewOccurrence {
            entity_key: entity_key.to_owned(),
            kind: kind.clone(),
            span,
            alias: alias.clone(),
        })
        .map_err(rejected)?;

    // Both inserts below must succeed once the first one ran.
    if session.occurrence(&created.occurrence_id).is_some() {
        return Err(ApplyError::Session(SessionError::DuplicateOccurrence {
            occurrence_id: created.occurrence_id,
        }));
    }
    if !session.entities().contains_key(&created.entity_id) {
        session
            .add_entity(Entity::new(created.entity_id.clone(), entity_key, kind.clone()))
            .map_err(ApplyError::Session)?;
    }

    let mut occurrence = EntityOccurrence::new(
        created.entity_id,
        kind.clone(),
        span.offset,
        span.offset_end,
        alias,
    );
    // An armed occurrence keeps the rest of the document non-clickable.
    if session.selected_id().is_some() {
        occurrence.set_selectable(false);
    }
    session
        .add_occurrence(created.occurrence_id.clone(), occurrence)
        .map_err(ApplyError::Session)?;

    delta.record_added(created.occurrence_id);
    Ok(())
}

fn apply_delete_occurrence<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    occurrence_id: &OccurrenceId,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    if session.occurrence(occurrence_id).is_none() {
        return Err(ApplyError::NotFound {
            kind: ObjectKind::Occurrence,
            id: occurrence_id.to_string(),
        });
    }

    resource.delete_occurrence(occurrence_id).map_err(rejected)?;

    let was_armed = session.selected_id() == Some(occurrence_id);
    session.remove_occurrence(occurrence_id);
    if was_armed {
        reset_selection(session);
    }
    delta.record_removed(occurrence_id.clone());
    Ok(())
}

fn apply_delete_entity<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    entity_id: &EntityId,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    if !session.entities().contains_key(entity_id) {
        return Err(ApplyError::NotFound {
            kind: ObjectKind::Entity,
            id: entity_id.to_string(),
        });
    }

    resource.delete_entity(entity_id).map_err(rejected)?;

    let armed = session.selected_id().cloned();
    let removed = session.remove_entity(entity_id).unwrap_or_default();
    if armed.is_some_and(|armed| removed.contains(&armed)) {
        reset_selection(session);
    }
    for occurrence_id in removed {
        delta.record_removed(occurrence_id);
    }
    Ok(())
}
