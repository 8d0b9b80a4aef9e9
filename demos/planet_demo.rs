//! Demonstration of planet generation and face queries

use icosphere_planet::*;

fn main() -> Result<()> {
    println!("Generating planet...");

    let config = PlanetConfigBuilder::new()
        .seed(42)
        .subdivision_level(4)?
        .build()?;

    let planet = Pipeline::from_config(&config).run(None)?;

    println!("{}", planet.summary());

    // Degree histogram of the vertex graph: 12 vertices of degree 5, the rest 6
    if let Some(mesh) = planet.mesh() {
        let degrees = geometry::build_vertex_neighbors(mesh.vertex_count(), mesh.faces());
        let mut counts = std::collections::BTreeMap::new();
        for neighbors in &degrees {
            *counts.entry(neighbors.len()).or_insert(0) += 1;
        }

        println!("\nVertex degree distribution:");
        for (degree, count) in &counts {
            println!("  degree {}: {}", degree, count);
        }
    }

    #[cfg(feature = "spatial-index")]
    {
        let pos = DVec3::new(planet.radius(), 0.0, 0.0);
        if let Some(face) = planet.find_face_at(pos) {
            println!("\nPosition {:?} is in face {}", pos, face);

            let neighbors = planet.get_neighbors(face);
            println!("Face {} has {} neighbors", face, neighbors.len());

            let nearby = planet.find_faces_within_radius(face, 2);
            println!("Found {} faces within 2 hops of face {}", nearby.len(), face);
        }
    }

    Ok(())
}
