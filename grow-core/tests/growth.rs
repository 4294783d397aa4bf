use grow_core::{
    GrowthConfig, MeshBuffers, MeshSink, Organism,
    tip::TipKind,
    types::Vector3,
};

/// Sink that checks every edge and face only references vertices it has
/// already handed out.
#[derive(Default)]
struct CheckingSink {
    vertices: usize,
    edges: usize,
    faces: Vec<[usize; 4]>,
}

impl MeshSink for CheckingSink {
    type Vertex = usize;

    fn new_vertex(&mut self, position: Vector3) -> usize {
        assert!(position.is_finite(), "vertex {position} is not finite");
        self.vertices += 1;
        self.vertices - 1
    }

    fn new_edge(&mut self, a: usize, b: usize) {
        assert!(a < self.vertices && b < self.vertices);
        self.edges += 1;
    }

    fn new_face(&mut self, quad: [usize; 4]) {
        for (i, v) in quad.iter().enumerate() {
            assert!(*v < self.vertices, "face references unseen vertex {v}");
            assert!(!quad[i + 1..].contains(v), "face {quad:?} repeats a vertex");
        }
        self.faces.push(quad);
    }
}

fn grown(cfg: GrowthConfig) -> (Organism, MeshBuffers) {
    let steps = cfg.steps;
    let mut organism = Organism::new(cfg).unwrap();
    let mut mesh = MeshBuffers::new();
    organism.make(steps, &mut mesh).unwrap();
    (organism, mesh)
}

#[test]
fn default_run_branches_and_lays_one_slice_per_tick() {
    let cfg = GrowthConfig::default();
    assert_eq!(cfg.seed, "GrowF");
    assert_eq!(cfg.steps, 10);

    let mut organism = Organism::new(cfg).unwrap();
    let mut sink = CheckingSink::default();
    organism.make(10, &mut sink).unwrap();

    assert_eq!(organism.age, 10);
    assert!(organism.tips.len() > 1, "root never bifurcated");
    for tip in &organism.tips {
        // Growth never stops by default: the birth slice plus one per tick.
        assert_eq!(tip.branch.len(), tip.age as usize + 1);
        assert_eq!(tip.kind, TipKind::Shoot);
    }

    assert_eq!(sink.vertices, organism.tips.len() + organism.total_cells());
    assert_eq!(sink.edges, organism.tips.len() - 1);

    // Every ring has the same resolution, so all consecutive rows stitch.
    let expected_faces: usize = organism
        .tips
        .iter()
        .map(|t| t.branch.windows(2).map(|w| w[1].len()).sum::<usize>())
        .sum();
    assert_eq!(sink.faces.len(), expected_faces);
}

#[test]
fn children_are_younger_and_deeper_than_their_parents() {
    let (organism, _) = grown(GrowthConfig::default());
    for (id, tip) in organism.tips.iter().enumerate() {
        match tip.parent {
            None => assert_eq!(tip.generation, 0),
            Some(p) => {
                assert!(p < id);
                let parent = &organism.tips[p];
                assert_eq!(tip.generation, parent.generation + 1);
                assert!(tip.age <= parent.age);
            }
        }
    }
}

#[test]
fn same_seed_grows_identical_meshes() {
    let (_, a) = grown(GrowthConfig::default());
    let (_, b) = grown(GrowthConfig::default());
    assert_eq!(a.vertices.len(), b.vertices.len());
    for (va, vb) in a.vertices.iter().zip(&b.vertices) {
        assert_eq!(va.to_array().map(f64::to_bits), vb.to_array().map(f64::to_bits));
    }
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.faces, b.faces);
}

#[test]
fn make_restarts_from_scratch() {
    let mut organism = Organism::new(GrowthConfig::default()).unwrap();
    let mut first = MeshBuffers::new();
    organism.make(6, &mut first).unwrap();
    let mut second = MeshBuffers::new();
    organism.make(6, &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_seed_grows_a_different_mesh() {
    let (_, a) = grown(GrowthConfig::default());
    let (_, b) = grown(GrowthConfig {
        seed: "Fern".to_owned(),
        ..GrowthConfig::default()
    });
    assert_ne!(a.vertices, b.vertices);
}

#[test]
fn frozen_params_bifurcate_on_every_period() {
    let cfg = GrowthConfig {
        params_live: false,
        ..GrowthConfig::default()
    };
    let (organism, _) = grown(cfg);
    let root = &organism.tips[0];
    // Period holds at 2 and count at 1: ages 2, 4, 6, 8 and 10.
    assert_eq!(root.bifurcation_count, 5);
    assert_eq!(root.params.period.value(), 2.0);
    let root_children = organism.tips.iter().filter(|t| t.parent == Some(0)).count();
    assert_eq!(root_children, 5);
}

#[test]
fn config_file_round_trip_drives_the_run() {
    let cfg = GrowthConfig::from_toml_str(
        r#"
        seed = "Moss"
        steps = 4
        "#,
    )
    .unwrap();
    let (organism, mesh) = grown(cfg);
    assert_eq!(organism.age, 4);
    assert_eq!(organism.dna.namespace(), "Moss");
    assert!(!mesh.faces.is_empty());
}
