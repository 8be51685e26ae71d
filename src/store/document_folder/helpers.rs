// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn parse_id<T>(field: &'static str, value: String) -> Result<crate::model::Id<T>, StoreError> {
    crate::model::Id::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

fn invalid_document(path: &Path, source: SessionError) -> StoreError {
    StoreError::InvalidDocument {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

/// Smallest `<prefix>:<n>` (n >= 1) not in `existing`.
fn next_free_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let taken = existing.collect::<BTreeSet<_>>();
    (1usize..)
        .map(|n| format!("{prefix}:{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| format!("{prefix}:0"))
}

fn session_from_json(path: &Path, document: DocumentJson) -> Result<LabelingSession, StoreError> {
    let document_id: DocumentId = parse_id("document_id", document.document_id)?;
    let mut session = LabelingSession::new(document_id);
    session.set_order_check(document.order_check);

    for segment in document.segments {
        let segment_id: SegmentId = parse_id("segments[].segment_id", segment.segment_id)?;
        session
            .add_segment(TextSegment::new(segment_id, segment.offset, segment.tokens))
            .map_err(|source| invalid_document(path, source))?;
    }

    for entity in document.entities {
        let entity_id: EntityId = parse_id("entities[].entity_id", entity.entity_id)?;
        let mut model = Entity::new(entity_id, entity.key, EntityKind::new(entity.kind));
        if let Some(canonical_form) = entity.canonical_form {
            model.set_canonical_form(canonical_form);
        }
        session
            .add_entity(model)
            .map_err(|source| invalid_document(path, source))?;
    }

    for occurrence in document.occurrences {
        let occurrence_id: OccurrenceId =
            parse_id("occurrences[].occurrence_id", occurrence.occurrence_id)?;
        let entity_id: EntityId = parse_id("occurrences[].entity_id", occurrence.entity_id)?;
        let Some(kind) = session.entities().get(&entity_id).map(|e| e.kind().clone()) else {
            return Err(invalid_document(
                path,
                SessionError::UnknownEntity { entity_id },
            ));
        };
        session
            .add_occurrence(
                occurrence_id,
                EntityOccurrence::new(
                    entity_id,
                    kind,
                    occurrence.offset,
                    occurrence.offset_end,
                    occurrence.alias,
                ),
            )
            .map_err(|source| invalid_document(path, source))?;
    }

    for relation in document.relations {
        let occurrence_a: OccurrenceId =
            parse_id("relations[].occurrence_a", relation.occurrence_a)?;
        let occurrence_b: OccurrenceId =
            parse_id("relations[].occurrence_b", relation.occurrence_b)?;
        let form_id: FormId = parse_id("relations[].form_id", relation.form_id)?;
        let mut model = Relation::new(occurrence_a, occurrence_b, form_id);
        if let Some(info) = relation.info {
            model = model.with_info(info);
        }
        session
            .add_relation(model)
            .map_err(|source| invalid_document(path, source))?;
    }

    Ok(session)
}

fn session_to_json(session: &LabelingSession) -> DocumentJson {
    DocumentJson {
        document_id: session.document_id().to_string(),
        order_check: session.order_check(),
        segments: session
            .segments()
            .values()
            .map(|segment| SegmentJson {
                segment_id: segment.segment_id().to_string(),
                offset: segment.offset(),
                tokens: segment.tokens().iter().map(ToString::to_string).collect(),
            })
            .collect(),
        entities: session
            .entities()
            .values()
            .map(|entity| EntityJson {
                entity_id: entity.entity_id().to_string(),
                key: entity.key().to_owned(),
                canonical_form: (entity.canonical_form() != entity.key())
                    .then(|| entity.canonical_form().to_owned()),
                kind: entity.kind().as_str().to_owned(),
            })
            .collect(),
        occurrences: session
            .occurrences()
            .iter()
            .map(|(occurrence_id, occurrence)| OccurrenceJson {
                occurrence_id: occurrence_id.to_string(),
                entity_id: occurrence.entity_id().to_string(),
                offset: occurrence.offset(),
                offset_end: occurrence.offset_end(),
                alias: occurrence.alias().to_owned(),
            })
            .collect(),
        relations: session
            .relations()
            .iter()
            .map(|relation| RelationJson {
                occurrence_a: relation.occurrence_a().to_string(),
                occurrence_b: relation.occurrence_b().to_string(),
                form_id: relation.form_id().to_string(),
                info: relation.info().map(str::to_owned),
            })
            .collect(),
    }
}

fn labels_to_json(session: &LabelingSession) -> LabelsJson {
    LabelsJson {
        document_id: session.document_id().to_string(),
        forms: session
            .forms()
            .iter()
            .map(|(form_id, value)| FormJson {
                form_id: form_id.to_string(),
                label: value.map(|label| label.code().to_owned()),
            })
            .collect(),
    }
}

/// Restores submitted values; entries for forms the document no longer has are skipped.
fn apply_labels(session: &mut LabelingSession, labels: LabelsJson) -> Result<(), StoreError> {
    for form in labels.forms {
        let form_id: FormId = parse_id("forms[].form_id", form.form_id)?;
        if !session.forms().contains_key(&form_id) {
            continue;
        }
        let value = match form.label {
            Some(code) => Some(code.parse::<Label>().map_err(|source| {
                StoreError::InvalidLabel {
                    form_id: form_id.to_string(),
                    source: Box::new(source),
                }
            })?),
            None => None,
        };
        session.set_form_value(&form_id, value);
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(
    root: &Path,
    path: &Path,
    value: &T,
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let mut contents = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    contents.push(b'\n');
    write_atomic(root, path, &contents, durability)
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".spanlabel.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    if let Err(source) = file.write_all(contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if durability == WriteDurability::Durable {
        if let Err(source) = file.sync_all() {
            drop(file);
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: tmp_path,
                source,
            });
        }
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
