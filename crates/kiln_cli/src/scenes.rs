//! Scene catalog.
//!
//! Each scene is built programmatically and selected by a small integer id.
//! A scene supplies its world, the objects to importance sample as lights,
//! a camera (position, lens and shutter; resolution is set by the caller),
//! a background and default image settings.

use std::sync::Arc;

use kiln_core::{CheckerTexture, ImageTexture, NoiseTexture, Texture};
use kiln_math::random::{gen_f64, gen_range, random_vec3};
use kiln_renderer::{
    AaRect, Background, BuildError, BvhNode, Camera, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, FlipFace, HittableList, Lambertian, Material, Metal, MovingSphere, RotateY,
    Scene, Sphere, Translate, Vec3,
};
use rand::RngCore;

/// Everything needed to render one catalog entry.
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: Camera,
    pub background: Background,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
}

type Builder = fn(&mut dyn RngCore) -> Result<SceneSetup, BuildError>;

pub struct SceneEntry {
    pub id: u32,
    pub name: &'static str,
    build: Builder,
}

impl SceneEntry {
    pub fn build(&self, rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
        (self.build)(rng)
    }
}

pub const CATALOG: &[SceneEntry] = &[
    SceneEntry { id: 1, name: "random spheres", build: random_spheres },
    SceneEntry { id: 2, name: "two checkered spheres", build: two_spheres },
    SceneEntry { id: 3, name: "two Perlin spheres", build: two_perlin_spheres },
    SceneEntry { id: 4, name: "earth", build: earth },
    SceneEntry { id: 5, name: "simple light", build: simple_light },
    SceneEntry { id: 6, name: "Cornell box", build: cornell_box },
    SceneEntry { id: 7, name: "Cornell smoke", build: cornell_smoke },
    SceneEntry { id: 8, name: "final scene", build: final_scene },
];

pub fn find(id: u32) -> Option<&'static SceneEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

const SKY: Color = Color::new(0.70, 0.80, 1.00);
const EARTH_TEXTURE: &str = "earthmap.jpg";

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(albedo))
}

fn light(strength: f64) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::from_color(Color::splat(strength)))
}

/// Camera looking at the origin from (13, 2, 3), shared by the outdoor scenes.
fn outdoor_camera(aperture: f64) -> Camera {
    Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, aperture, 10.0)
        .with_shutter(0.0, 1.0)
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0)
}

fn random_spheres(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker)),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Vec3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse spheres bounce during the shutter interval
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(MovingSphere::new(center, center1, 0.0, 1.0, 0.2, lambertian(albedo)));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                world.add(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?),
        camera: outdoor_camera(0.1),
        background: Background::Solid(SKY),
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 100,
    })
}

fn two_spheres(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(checker));

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material));

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?),
        camera: outdoor_camera(0.0),
        background: Background::Solid(SKY),
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 100,
    })
}

/// Ground and a floating sphere, both with Perlin marble.
fn perlin_spheres(world: &mut HittableList, rng: &mut dyn RngCore) {
    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, rng));
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(noise));

    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, material.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, material));
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let mut world = HittableList::new();
    perlin_spheres(&mut world, rng);

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?),
        camera: outdoor_camera(0.0),
        background: Background::Solid(SKY),
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 100,
    })
}

fn earth(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let texture: Arc<dyn Texture> = Arc::new(ImageTexture::open(EARTH_TEXTURE));

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::ZERO, 2.0, Arc::new(Lambertian::new(texture))));

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?),
        camera: outdoor_camera(0.0),
        background: Background::Solid(SKY),
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 100,
    })
}

fn simple_light(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let mut world = HittableList::new();
    perlin_spheres(&mut world, rng);

    let lamp = light(4.0);
    world.add(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, lamp.clone()));

    let camera = Camera::new()
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0);

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?)
            .with_lights(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, lamp)),
        camera,
        background: Background::Solid(Color::ZERO),
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 400,
    })
}

/// The five walls of the Cornell box, open toward the camera.
fn cornell_walls(world: &mut HittableList) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.add(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green));
    world.add(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red));
    world.add(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()));
    world.add(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()));
    world.add(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white));
}

fn cornell_box(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let mut world = HittableList::new();
    cornell_walls(&mut world);

    // Ceiling light faces down into the box
    let lamp = light(15.0);
    world.add(FlipFace::new(AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, lamp.clone())));

    let aluminum: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.85, 0.88), 0.0));
    world.add(Translate::new(
        RotateY::new(
            Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), aluminum),
            15.0,
        ),
        Vec3::new(265.0, 0.0, 295.0),
    ));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass.clone()));

    // Light sampling also aims at the glass sphere to resolve its caustic
    let mut lights = HittableList::new();
    lights.add(AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, lamp));
    lights.add(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?).with_lights(lights),
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
        aspect_ratio: 1.0,
        samples_per_pixel: 200,
    })
}

fn cornell_smoke(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    let mut world = HittableList::new();
    cornell_walls(&mut world);

    let lamp = light(7.0);
    world.add(FlipFace::new(AaRect::xz(113.0, 443.0, 127.0, 432.0, 554.0, lamp.clone())));

    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let tall = Translate::new(
        RotateY::new(
            Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()),
            15.0,
        ),
        Vec3::new(265.0, 0.0, 295.0),
    );
    let short = Translate::new(
        RotateY::new(
            Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white),
            -18.0,
        ),
        Vec3::new(130.0, 0.0, 65.0),
    );

    world.add(ConstantMedium::from_color(tall, 0.01, Color::ZERO));
    world.add(ConstantMedium::from_color(short, 0.01, Color::ONE));

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?)
            .with_lights(AaRect::xz(113.0, 443.0, 127.0, 432.0, 554.0, lamp)),
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
        aspect_ratio: 1.0,
        samples_per_pixel: 200,
    })
}

fn final_scene(rng: &mut dyn RngCore) -> Result<SceneSetup, BuildError> {
    // Field of boxes of random height as the ground
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let mut boxes = HittableList::new();
    let boxes_per_side = 20;
    let w = 100.0;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let x0 = -1000.0 + i as f64 * w;
            let z0 = -1000.0 + j as f64 * w;
            let y1 = gen_range(rng, 1.0, 101.0);
            boxes.add(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }

    let mut world = HittableList::new();
    world.add(BvhNode::from_list(boxes, 0.0, 1.0, rng)?);

    let lamp = light(7.0);
    world.add(FlipFace::new(AaRect::xz(123.0, 423.0, 147.0, 412.0, 554.0, lamp.clone())));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    world.add(MovingSphere::new(
        center0,
        center1,
        0.0,
        1.0,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, glass.clone()));
    world.add(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue subsurface fog
    let shell_center = Vec3::new(360.0, 150.0, 145.0);
    world.add(Sphere::new(shell_center, 70.0, glass.clone()));
    world.add(ConstantMedium::from_color(
        Sphere::new(shell_center, 70.0, glass.clone()),
        0.2,
        Color::new(0.2, 0.4, 0.9),
    ));

    // Thin mist over everything
    world.add(ConstantMedium::from_color(
        Sphere::new(Vec3::ZERO, 5000.0, glass),
        0.0001,
        Color::ONE,
    ));

    let earth: Arc<dyn Texture> = Arc::new(ImageTexture::open(EARTH_TEXTURE));
    world.add(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(earth)),
    ));

    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(0.1, rng));
    world.add(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(noise)),
    ));

    // Cluster of small spheres under its own hierarchy
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white.clone()));
    }
    world.add(Translate::new(
        RotateY::new(BvhNode::from_list(cluster, 0.0, 1.0, rng)?, 15.0),
        Vec3::new(-100.0, 270.0, 395.0),
    ));

    let camera = Camera::new()
        .with_position(Vec3::new(478.0, 278.0, -600.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0);

    Ok(SceneSetup {
        scene: Scene::new(BvhNode::from_list(world, 0.0, 1.0, rng)?)
            .with_lights(AaRect::xz(123.0, 423.0, 147.0, 412.0, 554.0, lamp)),
        camera,
        background: Background::Solid(Color::ZERO),
        aspect_ratio: 1.0,
        samples_per_pixel: 1000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_math::{Interval, Ray};
    use kiln_renderer::Hittable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_ids_are_unique_and_findable() {
        for (i, entry) in CATALOG.iter().enumerate() {
            assert_eq!(entry.id, i as u32 + 1);
            assert_eq!(find(entry.id).map(|e| e.name), Some(entry.name));
        }
        assert!(find(0).is_none());
        assert!(find(99).is_none());
    }

    #[test]
    fn test_every_scene_builds() {
        for entry in CATALOG {
            let mut rng = StdRng::seed_from_u64(u64::from(entry.id));
            let setup = entry.build(&mut rng);
            assert!(setup.is_ok(), "scene {} failed to build", entry.name);
        }
    }

    #[test]
    fn test_cornell_box_camera_sees_back_wall() {
        let mut rng = StdRng::seed_from_u64(6);
        let setup = find(6).unwrap().build(&mut rng).unwrap();

        // Above the sphere and the tall box, between the side walls
        let ray = Ray::new(Vec3::new(100.0, 450.0, -800.0), Vec3::Z, 0.0);
        let rec = setup
            .scene
            .world()
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .unwrap();
        assert!((rec.p.z - 555.0).abs() < 1e-9);
        assert!(setup.scene.lights().is_some());
    }

    #[test]
    fn test_cornell_light_faces_down() {
        let mut rng = StdRng::seed_from_u64(6);
        let setup = find(6).unwrap().build(&mut rng).unwrap();

        // Straight up from the floor, under the lamp and clear of both objects
        let ray = Ray::new(Vec3::new(330.0, 1.0, 230.0), Vec3::Y, 0.0);
        let rec = setup
            .scene
            .world()
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .unwrap();
        assert!((rec.p.y - 554.0).abs() < 1e-9);
        assert_eq!(rec.material.emitted(&rec), Color::splat(15.0));
    }
}
