//! Binary planet files
//!
//! # Layout
//!
//! ```text
//! magic    8 bytes   b"PLNTBIN\0"
//! version  u32 LE    1
//! body     bincode   PlanetRecord
//! ```
//!
//! Adjacency is stored ragged: one neighbor count per face plus the
//! concatenation of every face's neighbor list in face order. Face IDs are
//! written as the identity sequence when the mesh has none. Face centers are
//! derived data and recomputed on load.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adjacency::FaceAdjacency;
use crate::error::{PlanetError, Result};
use crate::mesh::PlanetMesh;
use crate::planet::Planet;
use crate::tectonics::Craton;

/// File signature
pub const MAGIC: &[u8; 8] = b"PLNTBIN\0";

/// Current format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PlanetRecord {
    radius: f64,
    subdivision_level: i32,
    seed: u64,
    mesh: Option<MeshGroup>,
    cratons: Option<Vec<CratonRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeshGroup {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    adjacency_lengths: Vec<u32>,
    adjacency_flat: Vec<u32>,
    face_ids: Option<Vec<u32>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CratonRecord {
    id: u32,
    center_index: u32,
}

impl MeshGroup {
    fn from_mesh(mesh: &PlanetMesh) -> Self {
        let (adjacency_lengths, adjacency_flat) = mesh.adjacency().to_ragged();
        Self {
            vertices: mesh.vertices().iter().map(|v| v.to_array()).collect(),
            faces: mesh.faces().to_vec(),
            adjacency_lengths,
            adjacency_flat,
            face_ids: Some(mesh.face_ids_or_identity()),
        }
    }

    fn into_mesh(self) -> Result<PlanetMesh> {
        let face_count = self.faces.len();
        let adjacency =
            FaceAdjacency::from_ragged(&self.adjacency_lengths, &self.adjacency_flat, face_count)?;
        let vertices = self.vertices.into_iter().map(DVec3::from_array).collect();
        PlanetMesh::from_parts(vertices, self.faces, adjacency, self.face_ids)
    }
}

impl Planet {
    /// Write the planet to a binary file, replacing any existing file
    ///
    /// # Example
    ///
    /// ```
    /// use icosphere_planet::*;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let path = dir.path().join("planet.bin");
    ///
    /// let planet = Planet::new(6371.0, 0, 42);
    /// planet.save(&path).unwrap();
    ///
    /// let loaded = Planet::load(&path).unwrap();
    /// assert_eq!(loaded.seed(), 42);
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let record = PlanetRecord {
            radius: self.radius(),
            subdivision_level: self.subdivision_level(),
            seed: self.seed(),
            mesh: self.mesh().map(MeshGroup::from_mesh),
            cratons: Some(
                self.cratons()
                    .iter()
                    .map(|c| CratonRecord {
                        id: c.id as u32,
                        center_index: c.center_index as u32,
                    })
                    .collect(),
            ),
        };

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, &record)?;
        writer.flush()?;

        info!(
            path = %path.display(),
            faces = self.face_count(),
            cratons = self.cratons().len(),
            "saved planet"
        );
        Ok(())
    }

    /// Read a planet from a binary file
    ///
    /// Missing optional groups load as absent: no mesh, no face IDs, or an
    /// empty craton list.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, and `MalformedFile`
    /// (or `Encoding`) if the file is not a valid planet file. Nothing is
    /// partially reconstructed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Planet> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PlanetError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = BufReader::new(File::open(path)?);

        let mut header = [0u8; 12];
        reader.read_exact(&mut header).map_err(|_| {
            PlanetError::MalformedFile("file too short for a planet header".to_string())
        })?;
        if &header[..8] != MAGIC {
            return Err(PlanetError::MalformedFile("bad magic bytes".to_string()));
        }
        let version = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        if version != FORMAT_VERSION {
            return Err(PlanetError::MalformedFile(format!(
                "unsupported format version {}",
                version
            )));
        }

        let record: PlanetRecord = bincode::deserialize_from(&mut reader)?;
        debug!(
            version,
            has_mesh = record.mesh.is_some(),
            has_cratons = record.cratons.is_some(),
            "decoded planet record"
        );

        let mut planet = Planet::new(record.radius, record.subdivision_level, record.seed);

        if let Some(group) = record.mesh {
            planet.set_mesh(group.into_mesh()?);
        }

        if let Some(cratons) = record.cratons {
            let face_count = planet.face_count();
            let cratons = cratons
                .into_iter()
                .map(|c| {
                    let center_index = c.center_index as usize;
                    if center_index >= face_count {
                        return Err(PlanetError::MalformedFile(format!(
                            "craton {} centered on missing face {}",
                            c.id, center_index
                        )));
                    }
                    Ok(Craton::new(c.id as usize, center_index))
                })
                .collect::<Result<Vec<_>>>()?;
            planet.set_cratons(cratons);
        }

        info!(
            path = %path.display(),
            faces = planet.face_count(),
            cratons = planet.cratons().len(),
            "loaded planet"
        );
        Ok(planet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_icosphere, RelaxOptions};
    use crate::tectonics::CratonSeeder;

    fn meshed_planet() -> Planet {
        let mut planet = Planet::new(6371.0, 2, 42);
        planet.set_mesh(generate_icosphere(2, 6371.0, RelaxOptions::default()).unwrap());
        planet
    }

    fn write_raw(path: &Path, record: &PlanetRecord) {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend(bincode::serialize(record).unwrap());
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planet.bin");

        let mut planet = meshed_planet();
        let mut rng = planet.rng();
        planet
            .seed_cratons(&CratonSeeder::default().count(4).min_distance(2), &mut rng)
            .unwrap();
        planet.save(&path).unwrap();

        let loaded = Planet::load(&path).unwrap();
        assert_eq!(loaded.radius(), 6371.0);
        assert_eq!(loaded.subdivision_level(), 2);
        assert_eq!(loaded.seed(), 42);

        let original = planet.mesh().unwrap();
        let restored = loaded.mesh().unwrap();
        assert_eq!(restored.vertices(), original.vertices());
        assert_eq!(restored.faces(), original.faces());
        assert!(restored.adjacency().same_membership(original.adjacency()));
        assert_eq!(restored.face_ids(), original.face_ids());
        assert_eq!(restored.face_centers(), original.face_centers());
        assert_eq!(loaded.cratons(), planet.cratons());
    }

    #[test]
    fn test_missing_face_ids_synthesized_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planet.bin");

        let mut planet = meshed_planet();
        let mut mesh = planet.mesh().unwrap().clone();
        mesh.set_face_ids(None).unwrap();
        planet.set_mesh(mesh);
        planet.save(&path).unwrap();

        let loaded = Planet::load(&path).unwrap();
        let ids = loaded.mesh().unwrap().face_ids().unwrap();
        assert_eq!(ids, (0..320).collect::<Vec<u32>>().as_slice());
    }

    #[test]
    fn test_absent_optional_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.bin");

        let mesh = meshed_planet().mesh().unwrap().clone();
        let mut group = MeshGroup::from_mesh(&mesh);
        group.face_ids = None;
        write_raw(
            &path,
            &PlanetRecord {
                radius: 6371.0,
                subdivision_level: 2,
                seed: 1,
                mesh: Some(group),
                cratons: None,
            },
        );

        let loaded = Planet::load(&path).unwrap();
        assert!(loaded.mesh().unwrap().face_ids().is_none());
        assert!(loaded.cratons().is_empty());
    }

    #[test]
    fn test_planet_without_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");

        Planet::new(3.5, 4, 9).save(&path).unwrap();
        let loaded = Planet::load(&path).unwrap();

        assert!(loaded.mesh().is_none());
        assert_eq!(loaded.radius(), 3.5);
        assert_eq!(loaded.subdivision_level(), 4);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Planet::load(dir.path().join("nope.bin"));
        assert!(matches!(result, Err(PlanetError::FileNotFound(_))));
    }

    #[test]
    fn test_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"NOTAPLANET\x01\x00\x00\x00").unwrap();

        assert!(matches!(
            Planet::load(&path),
            Err(PlanetError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, b"PLN").unwrap();

        assert!(matches!(
            Planet::load(&path),
            Err(PlanetError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.bin");
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&99u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            Planet::load(&path),
            Err(PlanetError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_corrupt_ragged_adjacency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.bin");

        let mesh = meshed_planet().mesh().unwrap().clone();
        let mut group = MeshGroup::from_mesh(&mesh);
        group.adjacency_flat.pop();
        write_raw(
            &path,
            &PlanetRecord {
                radius: 1.0,
                subdivision_level: 2,
                seed: 0,
                mesh: Some(group),
                cratons: None,
            },
        );

        assert!(matches!(
            Planet::load(&path),
            Err(PlanetError::MalformedFile(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.bin");
        meshed_planet().save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(matches!(Planet::load(&path), Err(PlanetError::Encoding(_))));
    }
}
